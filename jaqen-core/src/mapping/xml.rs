//! Reader and writer for the game's resource-manager `config.xml`.
//!
//! ```xml
//! <record>
//!     <boolean id="preload" value="false"/>
//!     <boolean id="amap" value="false"/>
//!     <list id="maps">
//!         <record from="Caucasian/face01" to="graphics/pictures/person/r-2000304951/portrait"/>
//!     </list>
//! </record>
//! ```

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::{Deserialize, Serialize};

use crate::error::MappingError;

const PERSON_PREFIX: &str = "graphics/pictures/person/";
const PORTRAIT_SUFFIX: &str = "/portrait";
const FM24_ID_PREFIX: &str = "r-";

/// Structural variants of the mapping file across game versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVariant {
    /// 2024 onwards: person ids are written as `r-<id>`.
    #[default]
    Fm24,
    /// 2020 to 2023: bare person ids.
    Legacy,
}

impl FormatVariant {
    /// Game versions the variants are known to cover.
    pub const SUPPORTED_VERSIONS: &'static [&'static str] = &["2024", "2023", "2022", "2021", "2020"];

    /// Map a game version (`"2024"`, `"2023"`, ...) onto its file variant.
    pub fn from_fm_version(version: &str) -> Result<Self, MappingError> {
        let year: u32 = version
            .trim()
            .parse()
            .map_err(|_| unsupported(version))?;
        match year {
            2024.. => Ok(Self::Fm24),
            2020..=2023 => Ok(Self::Legacy),
            _ => Err(unsupported(version)),
        }
    }

    /// The `to` attribute for a player's portrait.
    pub fn person_path(self, player_id: &str) -> String {
        match self {
            Self::Fm24 => format!("{PERSON_PREFIX}{FM24_ID_PREFIX}{player_id}{PORTRAIT_SUFFIX}"),
            Self::Legacy => format!("{PERSON_PREFIX}{player_id}{PORTRAIT_SUFFIX}"),
        }
    }

    /// Recover the player id from a `to` attribute, along with the layout the
    /// entry appears to be written in.
    ///
    /// The `r-` prefix is only removed when reading as [`FormatVariant::Fm24`];
    /// a `Legacy` read keeps the id verbatim so ids that themselves start with
    /// `r-` survive a write/open cycle.
    pub fn parse_person_path(to: &str, hint: FormatVariant) -> Option<(Self, String)> {
        let to = to.trim().trim_start_matches('/');
        let rest = to.strip_prefix(PERSON_PREFIX)?;
        let id = rest.strip_suffix(PORTRAIT_SUFFIX).unwrap_or(rest);
        if id.is_empty() || id.contains('/') {
            return None;
        }
        match (hint, id.strip_prefix(FM24_ID_PREFIX)) {
            (Self::Fm24, Some("")) => None,
            (Self::Fm24, Some(bare)) => Some((Self::Fm24, bare.to_string())),
            (Self::Legacy, Some(bare)) if is_person_number(bare) => {
                Some((Self::Fm24, id.to_string()))
            }
            _ => Some((Self::Legacy, id.to_string())),
        }
    }
}

/// Game person ids are plain decimal numbers.
fn is_person_number(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

fn unsupported(version: &str) -> MappingError {
    MappingError::unsupported_version(format!(
        "{} (expected one of {}, or later)",
        version.trim(),
        FormatVariant::SUPPORTED_VERSIONS.join(", ")
    ))
}

impl fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fm24 => write!(f, "fm24"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for FormatVariant {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fm24" => Ok(Self::Fm24),
            "legacy" => Ok(Self::Legacy),
            other => Self::from_fm_version(other),
        }
    }
}

/// The boolean flags at the top of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordFlags {
    pub preload: bool,
    pub amap: bool,
}

/// One `<record from=".." to=".."/>` entry, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlEntry {
    pub player_id: String,
    pub image_path: String,
    pub variant: FormatVariant,
}

/// Everything read from a mapping file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecord {
    pub flags: RecordFlags,
    pub entries: Vec<XmlEntry>,
}

impl ParsedRecord {
    /// The variant most entries were written in, if any entries exist.
    pub fn dominant_variant(&self) -> Option<FormatVariant> {
        let fm24 = self
            .entries
            .iter()
            .filter(|e| e.variant == FormatVariant::Fm24)
            .count();
        match self.entries.len() {
            0 => None,
            n if fm24 * 2 >= n => Some(FormatVariant::Fm24),
            _ => Some(FormatVariant::Legacy),
        }
    }
}

/// Parse a mapping file. Both id forms are accepted in the same file; `hint`
/// decides how an `r-` prefixed id is read (see [`FormatVariant::parse_person_path`]).
pub fn parse_record<R: BufRead>(
    reader: R,
    hint: FormatVariant,
) -> Result<ParsedRecord, MappingError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut record = ParsedRecord::default();
    let mut depth = 0usize;
    let mut list_depth: Option<usize> = None;
    let mut saw_root = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if depth == 0 {
                    saw_root = true;
                }
                match tag_name.as_str() {
                    "list" => list_depth = Some(depth),
                    "record" if list_depth.is_some() => read_entry(e, hint, &mut record)?,
                    "boolean" => read_flag(e, &mut record.flags)?,
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if depth == 0 {
                    saw_root = true;
                }
                match tag_name.as_str() {
                    "record" if list_depth.is_some() => read_entry(e, hint, &mut record)?,
                    "boolean" => read_flag(e, &mut record.flags)?,
                    _ => {}
                }
            }
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                if e.name().as_ref() == b"list" && list_depth == Some(depth) {
                    list_depth = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(MappingError::invalid_record("no root element"));
    }

    Ok(record)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, MappingError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn read_flag(e: &BytesStart<'_>, flags: &mut RecordFlags) -> Result<(), MappingError> {
    let Some(id) = attribute(e, b"id")? else {
        return Ok(());
    };
    let value = attribute(e, b"value")?
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    match id.as_str() {
        "preload" => flags.preload = value,
        "amap" => flags.amap = value,
        _ => {}
    }
    Ok(())
}

fn read_entry(
    e: &BytesStart<'_>,
    hint: FormatVariant,
    record: &mut ParsedRecord,
) -> Result<(), MappingError> {
    let (Some(from), Some(to)) = (attribute(e, b"from")?, attribute(e, b"to")?) else {
        log::warn!("Ignoring mapping record without from/to attributes");
        return Ok(());
    };
    match FormatVariant::parse_person_path(&to, hint) {
        Some((variant, player_id)) => record.entries.push(XmlEntry {
            player_id,
            image_path: from,
            variant,
        }),
        None => log::warn!("Ignoring mapping record with unrecognised target \"{to}\""),
    }
    Ok(())
}

/// Render a full mapping file. Valid XML even with no entries.
pub fn render_record<'a, I>(flags: RecordFlags, variant: FormatVariant, entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut xml = String::new();
    xml.push_str("<record>\n");
    xml.push_str("\t<!-- resource manager options -->\n\n");
    xml.push_str("\t<!-- don't preload anything in this folder -->\n");
    write_flag(&mut xml, "preload", flags.preload);
    xml.push('\n');
    xml.push_str("\t<!-- turn off auto mapping -->\n");
    write_flag(&mut xml, "amap", flags.amap);
    xml.push('\n');
    xml.push_str("\t<!-- face mappings -->\n");
    xml.push_str("\t<list id=\"maps\">\n");
    for (player_id, image_path) in entries {
        xml.push_str("\t\t<record from=\"");
        xml.push_str(&quick_xml::escape::escape(image_path));
        xml.push_str("\" to=\"");
        xml.push_str(&quick_xml::escape::escape(&variant.person_path(player_id)));
        xml.push_str("\"/>\n");
    }
    xml.push_str("\t</list>\n");
    xml.push_str("</record>\n");
    xml
}

fn write_flag(xml: &mut String, id: &str, value: bool) {
    xml.push_str("\t<boolean id=\"");
    xml.push_str(id);
    xml.push_str("\" value=\"");
    xml.push_str(if value { "true" } else { "false" });
    xml.push_str("\"/>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<record>
	<boolean id="preload" value="false"/>
	<boolean id="amap" value="true"/>
	<list id="maps">
		<record from="Caucasian/face01" to="graphics/pictures/person/r-2000304951/portrait"/>
		<record from="African/face &amp; co" to="graphics/pictures/person/123/portrait"></record>
		<record from="Asian/x" to="graphics/pictures/club/55/logo"/>
	</list>
</record>"#;

    #[test]
    fn test_parse_record_tolerates_both_variants() {
        let record = parse_record(SAMPLE.as_bytes(), FormatVariant::Fm24).unwrap();
        assert_eq!(record.flags, RecordFlags { preload: false, amap: true });
        assert_eq!(
            record.entries,
            vec![
                XmlEntry {
                    player_id: "2000304951".into(),
                    image_path: "Caucasian/face01".into(),
                    variant: FormatVariant::Fm24,
                },
                XmlEntry {
                    player_id: "123".into(),
                    image_path: "African/face & co".into(),
                    variant: FormatVariant::Legacy,
                },
            ]
        );
    }

    #[test]
    fn test_parse_empty_input_is_error() {
        assert!(parse_record("".as_bytes(), FormatVariant::Fm24).is_err());
    }

    #[test]
    fn test_parse_malformed_xml_is_error() {
        assert!(
            parse_record("<record><list id=\"maps\"></record>".as_bytes(), FormatVariant::Fm24)
                .is_err()
        );
    }

    #[test]
    fn test_render_empty_is_parseable() {
        let xml = render_record(
            RecordFlags::default(),
            FormatVariant::Fm24,
            Vec::<(&str, &str)>::new(),
        );
        assert!(xml.contains("<list id=\"maps\">"));
        let record = parse_record(xml.as_bytes(), FormatVariant::Fm24).unwrap();
        assert!(record.entries.is_empty());
    }

    #[test]
    fn test_render_uses_variant_and_escapes() {
        let xml = render_record(
            RecordFlags::default(),
            FormatVariant::Legacy,
            [("42", "Asian/a\"b")],
        );
        assert!(xml.contains(r#"from="Asian/a&quot;b" to="graphics/pictures/person/42/portrait""#));
    }

    #[test]
    fn test_person_path_round_trip() {
        for variant in [FormatVariant::Fm24, FormatVariant::Legacy] {
            let path = variant.person_path("2000304951");
            assert_eq!(
                FormatVariant::parse_person_path(&path, variant),
                Some((variant, "2000304951".to_string()))
            );
        }
        assert_eq!(
            FormatVariant::parse_person_path(
                "graphics/pictures/person/r-/portrait",
                FormatVariant::Fm24
            ),
            None
        );
    }

    #[test]
    fn test_legacy_read_keeps_prefixed_ids() {
        let xml = render_record(
            RecordFlags::default(),
            FormatVariant::Legacy,
            [("r-5", "Asian/a"), ("r-abc", "Asian/b"), ("7", "Asian/c")],
        );
        let record = parse_record(xml.as_bytes(), FormatVariant::Legacy).unwrap();
        let ids: Vec<&str> = record.entries.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(ids, vec!["r-5", "r-abc", "7"]);

        // Read as the newer layout, the prefix is the layout marker.
        let record = parse_record(xml.as_bytes(), FormatVariant::Fm24).unwrap();
        assert_eq!(record.entries[0].player_id, "5");
    }

    #[test]
    fn test_fm24_round_trip_with_prefixed_id() {
        let xml = render_record(RecordFlags::default(), FormatVariant::Fm24, [("r-5", "Asian/a")]);
        let record = parse_record(xml.as_bytes(), FormatVariant::Fm24).unwrap();
        assert_eq!(record.entries[0].player_id, "r-5");
    }

    #[test]
    fn test_from_fm_version() {
        assert_eq!(FormatVariant::from_fm_version("2024").unwrap(), FormatVariant::Fm24);
        assert_eq!(FormatVariant::from_fm_version("2026").unwrap(), FormatVariant::Fm24);
        assert_eq!(FormatVariant::from_fm_version("2021").unwrap(), FormatVariant::Legacy);
        assert!(FormatVariant::from_fm_version("2019").is_err());
        assert!(FormatVariant::from_fm_version("latest").is_err());
        let err = FormatVariant::from_fm_version("2019").unwrap_err().to_string();
        assert!(err.contains("2020"), "{err}");
        assert_eq!("legacy".parse::<FormatVariant>().unwrap(), FormatVariant::Legacy);
    }
}
