use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::output::RankedIndex;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub copied: usize,
    pub missing: usize,
}

/// Copy the source image of every ranked entry into `public/<class>/<subject>/`.
/// Missing sources are logged and skipped.
pub fn copy_ranked_images(images_src: &Path, public_dir: &Path, index: &RankedIndex) -> Result<CopyStats> {
    let mut stats = CopyStats::default();

    for (class, subjects) in index {
        for (subject, images) in subjects {
            let dest_dir = public_dir.join(class).join(subject);
            std::fs::create_dir_all(&dest_dir)
                .with_context(|| format!("Failed to create {}", dest_dir.display()))?;

            for image in images {
                let src = images_src.join(&image.file_name);
                if !src.is_file() {
                    warn!("Image not found at {}", src.display());
                    stats.missing += 1;
                    continue;
                }
                let dest = dest_dir.join(&image.file_name);
                std::fs::copy(&src, &dest)
                    .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;
                stats.copied += 1;
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ErrorLists, RankedImage};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn image(name: &str) -> RankedImage {
        RankedImage {
            id: name.into(),
            file_name: name.into(),
            page_number: "N/A".into(),
            errors: ErrorLists::default(),
            total_errors: 1,
        }
    }

    #[test]
    fn copies_present_and_skips_missing() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("images");
        let public = tmp.path().join("public").join("images");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("Class6_Sets_3.png"), b"png").unwrap();

        let mut index = RankedIndex::new();
        index.insert(
            "Class6".into(),
            BTreeMap::from([
                ("Sets".to_string(), vec![image("Class6_Sets_3.png"), image("Class6_Sets_9.png")]),
                ("Algebra".to_string(), vec![]),
            ]),
        );

        let stats = copy_ranked_images(&src, &public, &index).unwrap();
        assert_eq!(stats, CopyStats { copied: 1, missing: 1 });
        assert_eq!(std::fs::read(public.join("Class6/Sets/Class6_Sets_3.png")).unwrap(), b"png");
        assert!(!public.join("Class6/Sets/Class6_Sets_9.png").exists());
        // Empty combinations still get their directory.
        assert!(public.join("Class6/Algebra").is_dir());
    }
}
