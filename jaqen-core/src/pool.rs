//! Face image catalogue, bucketed by ethnic category.
//!
//! The pool is built by walking an image root where every category has its
//! own sub-folder (`<root>/Caucasian/...`, `<root>/Central European/...`).
//! Files are bucketed by the nearest ancestor folder whose name is exactly a
//! category name, so nested layouts such as `Caucasian/set2/face.png` work.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::PoolError;
use crate::ethnicity::EthnicCategory;

/// File extensions (lowercase) that count as face images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// One image file in the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub category: EthnicCategory,
    /// Set once the image has been drawn with duplicate avoidance.
    pub used: bool,
}

/// Per-run catalogue of face images with its own random source.
#[derive(Debug)]
pub struct ImagePool<R = ChaCha8Rng> {
    buckets: HashMap<EthnicCategory, Vec<ImageRecord>>,
    rng: R,
}

impl ImagePool<ChaCha8Rng> {
    /// Walk `root` and index its images, seeding the pool from OS entropy.
    pub fn build(root: &Path) -> Result<Self, PoolError> {
        Self::build_with_rng(root, ChaCha8Rng::from_entropy())
    }

    /// Walk `root` with a fixed seed, for reproducible draws.
    pub fn build_seeded(root: &Path, seed: u64) -> Result<Self, PoolError> {
        Self::build_with_rng(root, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> ImagePool<R> {
    /// Walk `root` and index its images using the given random source.
    ///
    /// Only an unreadable `root` is an error; unreadable sub-folders are
    /// logged and skipped, and empty categories are allowed.
    pub fn build_with_rng(root: &Path, rng: R) -> Result<Self, PoolError> {
        let entries = std::fs::read_dir(root).map_err(|source| PoolError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let extensions = extension_set(IMAGE_EXTENSIONS);
        let root_category = root
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(EthnicCategory::from_folder_name);

        let mut buckets: HashMap<EthnicCategory, Vec<ImageRecord>> = HashMap::new();
        let mut dir_entries: Vec<std::fs::DirEntry> = entries.flatten().collect();
        dir_entries.sort_by_key(|e| e.path());
        for entry in dir_entries {
            collect_images(&entry.path(), root_category, &extensions, &mut buckets);
        }

        let pool = Self {
            buckets,
            rng,
        };
        log::info!(
            "Indexed {} image(s) under {}",
            pool.total(),
            root.display()
        );
        for category in EthnicCategory::ALL {
            log::debug!("  {}: {} image(s)", category, pool.len(category));
        }
        Ok(pool)
    }

    /// Number of images in a category, used or not.
    pub fn len(&self, category: EthnicCategory) -> usize {
        self.buckets.get(&category).map_or(0, Vec::len)
    }

    /// Number of images in a category not yet drawn with duplicate avoidance.
    pub fn remaining(&self, category: EthnicCategory) -> usize {
        self.buckets
            .get(&category)
            .map_or(0, |b| b.iter().filter(|r| !r.used).count())
    }

    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Pick a random image of `category`.
    ///
    /// With `avoid_duplicates`, only images not drawn before are eligible and
    /// the chosen image is marked used; when none are left the category is
    /// exhausted. Without it every image is eligible and nothing is marked.
    pub fn draw(
        &mut self,
        category: EthnicCategory,
        avoid_duplicates: bool,
    ) -> Result<PathBuf, PoolError> {
        let bucket = match self.buckets.get_mut(&category) {
            Some(b) if !b.is_empty() => b,
            _ => return Err(PoolError::exhausted(category)),
        };

        if !avoid_duplicates {
            let idx = self.rng.gen_range(0..bucket.len());
            return Ok(bucket[idx].path.clone());
        }

        let eligible: Vec<usize> = bucket
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.used)
            .map(|(i, _)| i)
            .collect();
        if eligible.is_empty() {
            return Err(PoolError::exhausted(category));
        }
        let idx = eligible[self.rng.gen_range(0..eligible.len())];
        let record = &mut bucket[idx];
        record.used = true;
        Ok(record.path.clone())
    }
}

/// Build the extension set from a list of extensions.
fn extension_set(extensions: &[&str]) -> HashSet<String> {
    extensions.iter().map(|e| e.to_lowercase()).collect()
}

/// Check if a path has an extension in the allowed set.
fn has_matching_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase()))
        .unwrap_or(false)
}

fn collect_images(
    path: &Path,
    category: Option<EthnicCategory>,
    extensions: &HashSet<String>,
    buckets: &mut HashMap<EthnicCategory, Vec<ImageRecord>>,
) {
    if path.is_file() {
        if let Some(category) = category {
            if has_matching_extension(path, extensions) {
                buckets.entry(category).or_default().push(ImageRecord {
                    path: path.to_path_buf(),
                    category,
                    used: false,
                });
            }
        }
        return;
    }
    if !path.is_dir() {
        return;
    }

    let category = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(EthnicCategory::from_folder_name)
        .or(category);

    let entries = match std::fs::read_dir(path) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("Skipping unreadable folder {}: {}", path.display(), e);
            return;
        }
    };
    let mut children: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    children.sort();
    for child in children {
        collect_images(&child, category, extensions, buckets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"img").unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("Caucasian/a.png"));
        touch(&root.join("Caucasian/b.JPG"));
        touch(&root.join("Caucasian/notes.txt"));
        touch(&root.join("Caucasian/set2/c.jpeg"));
        touch(&root.join("Central European/d.bmp"));
        touch(&root.join("african/e.png"));
        touch(&root.join("loose.png"));
        touch(&root.join("extra/Asian/f.gif"));
        dir
    }

    #[test]
    fn test_build_buckets_by_nearest_category_folder() {
        let dir = fixture();
        let pool = ImagePool::build_seeded(dir.path(), 1).unwrap();
        assert_eq!(pool.len(EthnicCategory::Caucasian), 3);
        assert_eq!(pool.len(EthnicCategory::CentralEuropean), 1);
        assert_eq!(pool.len(EthnicCategory::Asian), 1);
        // Folder names are case-sensitive.
        assert_eq!(pool.len(EthnicCategory::African), 0);
        assert_eq!(pool.total(), 5);
    }

    #[test]
    fn test_build_missing_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ImagePool::build(&dir.path().join("nope"));
        assert!(matches!(result, Err(PoolError::Io { .. })));
    }

    #[test]
    fn test_build_empty_root_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ImagePool::build(dir.path()).unwrap();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_draw_empty_bucket() {
        let dir = fixture();
        let mut pool = ImagePool::build_seeded(dir.path(), 1).unwrap();
        let err = pool.draw(EthnicCategory::Mena, false).unwrap_err();
        assert!(matches!(
            err,
            PoolError::CategoryExhausted { category: EthnicCategory::Mena }
        ));
    }

    #[test]
    fn test_draw_without_avoidance_repeats_single_image() {
        let dir = fixture();
        let mut pool = ImagePool::build_seeded(dir.path(), 7).unwrap();
        let first = pool.draw(EthnicCategory::Asian, false).unwrap();
        let second = pool.draw(EthnicCategory::Asian, false).unwrap();
        assert_eq!(first, second);
        assert_eq!(pool.remaining(EthnicCategory::Asian), 1);
    }

    #[test]
    fn test_draw_with_avoidance_never_repeats_then_exhausts() {
        let dir = fixture();
        let mut pool = ImagePool::build_seeded(dir.path(), 3).unwrap();
        let mut seen = HashSet::new();
        for _ in 0..3 {
            let path = pool.draw(EthnicCategory::Caucasian, true).unwrap();
            assert!(seen.insert(path));
        }
        assert!(matches!(
            pool.draw(EthnicCategory::Caucasian, true),
            Err(PoolError::CategoryExhausted { .. })
        ));
        // Repeats are still allowed when avoidance is off.
        assert!(pool.draw(EthnicCategory::Caucasian, false).is_ok());
    }

    #[test]
    fn test_draw_is_uniform_across_images() {
        let dir = fixture();
        let mut pool = ImagePool::build_seeded(dir.path(), 11).unwrap();
        let mut counts: HashMap<PathBuf, usize> = HashMap::new();
        for _ in 0..3000 {
            let path = pool.draw(EthnicCategory::Caucasian, false).unwrap();
            *counts.entry(path).or_default() += 1;
        }
        assert_eq!(counts.len(), 3);
        // Expected 1000 each, standard deviation about 26.
        for (path, count) in &counts {
            assert!(
                (850..=1150).contains(count),
                "{} drawn {count} times",
                path.display()
            );
        }
    }

    #[test]
    fn test_draw_with_avoidance_is_uniform_over_first_pick() {
        let dir = fixture();
        let mut counts: HashMap<PathBuf, usize> = HashMap::new();
        for seed in 0..600 {
            let mut pool = ImagePool::build_seeded(dir.path(), seed).unwrap();
            let path = pool.draw(EthnicCategory::Caucasian, true).unwrap();
            *counts.entry(path).or_default() += 1;
        }
        assert_eq!(counts.len(), 3);
        for count in counts.values() {
            assert!((130..=270).contains(count), "{counts:?}");
        }
    }

    #[test]
    fn test_separate_pools_do_not_share_used_flags() {
        let dir = fixture();
        let mut a = ImagePool::build_seeded(dir.path(), 1).unwrap();
        let mut b = ImagePool::build_seeded(dir.path(), 2).unwrap();
        a.draw(EthnicCategory::Asian, true).unwrap();
        assert!(a.draw(EthnicCategory::Asian, true).is_err());
        assert!(b.draw(EthnicCategory::Asian, true).is_ok());
    }
}
