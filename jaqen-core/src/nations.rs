//! Compiled-in base nation table.
//!
//! Codes are the three-letter nation codes the game prints in its exports.

use crate::ethnicity::EthnicCategory;
use crate::ethnicity::EthnicCategory::*;

/// One row of the base nation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NationInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub category: EthnicCategory,
}

const fn nation(code: &'static str, name: &'static str, category: EthnicCategory) -> NationInfo {
    NationInfo {
        code,
        name,
        category,
    }
}

pub static BASE_NATIONS: &[NationInfo] = &[
    // African
    nation("ANG", "Angola", African),
    nation("BEN", "Benin", African),
    nation("BOT", "Botswana", African),
    nation("BFA", "Burkina Faso", African),
    nation("BDI", "Burundi", African),
    nation("CMR", "Cameroon", African),
    nation("CPV", "Cape Verde", African),
    nation("CTA", "Central African Republic", African),
    nation("CHA", "Chad", African),
    nation("COM", "Comoros", African),
    nation("CGO", "Congo", African),
    nation("COD", "DR Congo", African),
    nation("CIV", "Ivory Coast", African),
    nation("DJI", "Djibouti", African),
    nation("EQG", "Equatorial Guinea", African),
    nation("ERI", "Eritrea", African),
    nation("SWZ", "Eswatini", African),
    nation("ETH", "Ethiopia", African),
    nation("GAB", "Gabon", African),
    nation("GAM", "Gambia", African),
    nation("GHA", "Ghana", African),
    nation("GUI", "Guinea", African),
    nation("GNB", "Guinea-Bissau", African),
    nation("KEN", "Kenya", African),
    nation("LES", "Lesotho", African),
    nation("LBR", "Liberia", African),
    nation("MAD", "Madagascar", African),
    nation("MWI", "Malawi", African),
    nation("MLI", "Mali", African),
    nation("MTN", "Mauritania", African),
    nation("MRI", "Mauritius", African),
    nation("MOZ", "Mozambique", African),
    nation("NAM", "Namibia", African),
    nation("NIG", "Niger", African),
    nation("NGA", "Nigeria", African),
    nation("RWA", "Rwanda", African),
    nation("STP", "Sao Tome and Principe", African),
    nation("SEN", "Senegal", African),
    nation("SEY", "Seychelles", African),
    nation("SLE", "Sierra Leone", African),
    nation("SOM", "Somalia", African),
    nation("RSA", "South Africa", African),
    nation("SSD", "South Sudan", African),
    nation("SDN", "Sudan", African),
    nation("TAN", "Tanzania", African),
    nation("TOG", "Togo", African),
    nation("UGA", "Uganda", African),
    nation("ZAM", "Zambia", African),
    nation("ZIM", "Zimbabwe", African),
    nation("JAM", "Jamaica", African),
    nation("HAI", "Haiti", African),
    nation("TRI", "Trinidad and Tobago", African),
    nation("BAH", "Bahamas", African),
    nation("BRB", "Barbados", African),
    nation("BER", "Bermuda", African),
    nation("GRN", "Grenada", African),
    nation("SKN", "St Kitts and Nevis", African),
    nation("LCA", "St Lucia", African),
    nation("VIN", "St Vincent and the Grenadines", African),
    nation("ATG", "Antigua and Barbuda", African),
    nation("DMA", "Dominica", African),
    nation("CUW", "Curacao", African),
    nation("SUR", "Suriname", African),
    nation("GUY", "Guyana", African),
    nation("CAY", "Cayman Islands", African),
    nation("MSR", "Montserrat", African),
    nation("AIA", "Anguilla", African),
    nation("TCA", "Turks and Caicos Islands", African),
    nation("VGB", "British Virgin Islands", African),
    nation("VIR", "US Virgin Islands", African),
    nation("ARU", "Aruba", African),
    nation("BOE", "Bonaire", African),
    nation("SMA", "Sint Maarten", African),
    // Asian
    nation("CHN", "China", Asian),
    nation("JPN", "Japan", Asian),
    nation("KOR", "South Korea", Asian),
    nation("PRK", "North Korea", Asian),
    nation("MNG", "Mongolia", Asian),
    nation("TPE", "Chinese Taipei", Asian),
    nation("HKG", "Hong Kong", Asian),
    nation("MAC", "Macau", Asian),
    nation("GUM", "Guam", Asian),
    nation("NMI", "Northern Mariana Islands", Asian),
    // Caucasian
    nation("ENG", "England", Caucasian),
    nation("SCO", "Scotland", Caucasian),
    nation("WAL", "Wales", Caucasian),
    nation("NIR", "Northern Ireland", Caucasian),
    nation("IRL", "Republic of Ireland", Caucasian),
    nation("FRA", "France", Caucasian),
    nation("USA", "United States", Caucasian),
    nation("CAN", "Canada", Caucasian),
    nation("AUS", "Australia", Caucasian),
    nation("NZL", "New Zealand", Caucasian),
    nation("GIB", "Gibraltar", Caucasian),
    // Central European
    nation("GER", "Germany", CentralEuropean),
    nation("AUT", "Austria", CentralEuropean),
    nation("SUI", "Switzerland", CentralEuropean),
    nation("NED", "Netherlands", CentralEuropean),
    nation("BEL", "Belgium", CentralEuropean),
    nation("LUX", "Luxembourg", CentralEuropean),
    nation("LIE", "Liechtenstein", CentralEuropean),
    nation("CZE", "Czech Republic", CentralEuropean),
    nation("SVK", "Slovakia", CentralEuropean),
    nation("POL", "Poland", CentralEuropean),
    nation("HUN", "Hungary", CentralEuropean),
    // EECA
    nation("RUS", "Russia", Eeca),
    nation("UKR", "Ukraine", Eeca),
    nation("BLR", "Belarus", Eeca),
    nation("LTU", "Lithuania", Eeca),
    nation("LVA", "Latvia", Eeca),
    nation("EST", "Estonia", Eeca),
    nation("MDA", "Moldova", Eeca),
    nation("ROU", "Romania", Eeca),
    nation("GEO", "Georgia", Eeca),
    nation("ARM", "Armenia", Eeca),
    nation("AZE", "Azerbaijan", Eeca),
    nation("KAZ", "Kazakhstan", Eeca),
    nation("UZB", "Uzbekistan", Eeca),
    nation("TKM", "Turkmenistan", Eeca),
    nation("KGZ", "Kyrgyzstan", Eeca),
    nation("TJK", "Tajikistan", Eeca),
    // Italmed
    nation("ITA", "Italy", Italmed),
    nation("SMR", "San Marino", Italmed),
    nation("MLT", "Malta", Italmed),
    // MENA
    nation("EGY", "Egypt", Mena),
    nation("MAR", "Morocco", Mena),
    nation("ALG", "Algeria", Mena),
    nation("TUN", "Tunisia", Mena),
    nation("LBY", "Libya", Mena),
    nation("KSA", "Saudi Arabia", Mena),
    nation("IRQ", "Iraq", Mena),
    nation("JOR", "Jordan", Mena),
    nation("SYR", "Syria", Mena),
    nation("LIB", "Lebanon", Mena),
    nation("ISR", "Israel", Mena),
    nation("PLE", "Palestine", Mena),
    nation("UAE", "United Arab Emirates", Mena),
    nation("QAT", "Qatar", Mena),
    nation("KUW", "Kuwait", Mena),
    nation("BHR", "Bahrain", Mena),
    nation("OMA", "Oman", Mena),
    nation("YEM", "Yemen", Mena),
    nation("TUR", "Turkey", Mena),
    // MESA
    nation("IRN", "Iran", Mesa),
    nation("AFG", "Afghanistan", Mesa),
    nation("PAK", "Pakistan", Mesa),
    nation("IND", "India", Mesa),
    nation("BAN", "Bangladesh", Mesa),
    nation("SRI", "Sri Lanka", Mesa),
    nation("NEP", "Nepal", Mesa),
    nation("BHU", "Bhutan", Mesa),
    nation("MDV", "Maldives", Mesa),
    // SAMed
    nation("ARG", "Argentina", SaMed),
    nation("URU", "Uruguay", SaMed),
    nation("CHI", "Chile", SaMed),
    // Scandinavian
    nation("NOR", "Norway", Scandinavian),
    nation("SWE", "Sweden", Scandinavian),
    nation("DEN", "Denmark", Scandinavian),
    nation("FIN", "Finland", Scandinavian),
    nation("ISL", "Iceland", Scandinavian),
    nation("FRO", "Faroe Islands", Scandinavian),
    // Seasian
    nation("THA", "Thailand", Seasian),
    nation("VIE", "Vietnam", Seasian),
    nation("IDN", "Indonesia", Seasian),
    nation("MAS", "Malaysia", Seasian),
    nation("PHI", "Philippines", Seasian),
    nation("SIN", "Singapore", Seasian),
    nation("MYA", "Myanmar", Seasian),
    nation("CAM", "Cambodia", Seasian),
    nation("LAO", "Laos", Seasian),
    nation("BRU", "Brunei", Seasian),
    nation("TLS", "Timor-Leste", Seasian),
    nation("FIJ", "Fiji", Seasian),
    nation("PNG", "Papua New Guinea", Seasian),
    nation("SOL", "Solomon Islands", Seasian),
    nation("VAN", "Vanuatu", Seasian),
    nation("SAM", "Samoa", Seasian),
    nation("TGA", "Tonga", Seasian),
    nation("TAH", "Tahiti", Seasian),
    nation("NCL", "New Caledonia", Seasian),
    nation("ASA", "American Samoa", Seasian),
    nation("COK", "Cook Islands", Seasian),
    // South American
    nation("BRA", "Brazil", SouthAmerican),
    nation("COL", "Colombia", SouthAmerican),
    nation("PER", "Peru", SouthAmerican),
    nation("VEN", "Venezuela", SouthAmerican),
    nation("BOL", "Bolivia", SouthAmerican),
    nation("ECU", "Ecuador", SouthAmerican),
    nation("PAR", "Paraguay", SouthAmerican),
    nation("MEX", "Mexico", SouthAmerican),
    nation("GUA", "Guatemala", SouthAmerican),
    nation("HON", "Honduras", SouthAmerican),
    nation("SLV", "El Salvador", SouthAmerican),
    nation("NCA", "Nicaragua", SouthAmerican),
    nation("CRC", "Costa Rica", SouthAmerican),
    nation("PAN", "Panama", SouthAmerican),
    nation("CUB", "Cuba", SouthAmerican),
    nation("DOM", "Dominican Republic", SouthAmerican),
    nation("PUR", "Puerto Rico", SouthAmerican),
    nation("BLZ", "Belize", SouthAmerican),
    // SpanMed
    nation("ESP", "Spain", SpanMed),
    nation("POR", "Portugal", SpanMed),
    nation("AND", "Andorra", SpanMed),
    // YugoGreek
    nation("SRB", "Serbia", YugoGreek),
    nation("CRO", "Croatia", YugoGreek),
    nation("BIH", "Bosnia and Herzegovina", YugoGreek),
    nation("MNE", "Montenegro", YugoGreek),
    nation("MKD", "North Macedonia", YugoGreek),
    nation("SVN", "Slovenia", YugoGreek),
    nation("KVX", "Kosovo", YugoGreek),
    nation("ALB", "Albania", YugoGreek),
    nation("GRE", "Greece", YugoGreek),
    nation("CYP", "Cyprus", YugoGreek),
    nation("BUL", "Bulgaria", YugoGreek),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique_and_upper_case() {
        let mut seen = HashSet::new();
        for n in BASE_NATIONS {
            assert!(seen.insert(n.code), "duplicate code {}", n.code);
            assert_eq!(n.code, n.code.to_uppercase());
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut seen = HashSet::new();
        for n in BASE_NATIONS {
            assert!(seen.insert(n.name.to_lowercase()), "duplicate name {}", n.name);
        }
    }
}
