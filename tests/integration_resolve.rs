//! Integration tests for a full run: scan, resolve, quarantine and undo.
//!
//! Images are generated on the fly so every scenario controls exactly which
//! files share content and which is larger.

use assert_fs::prelude::*;
use assert_fs::TempDir;
use image::{Rgb, RgbImage};
use image_dedup::core::hasher::HashAlgorithmKind;
use image_dedup::core::pipeline::{self, Pipeline};
use image_dedup::core::quarantine::{pair_tag, DEFAULT_QUARANTINE_DIR};
use image_dedup::core::resolver::Winner;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Dark left half, bright right half
fn vertical_split(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([20, 20, 20])
        } else {
            Rgb([230, 230, 230])
        }
    })
}

/// Dark top half, bright bottom half
fn horizontal_split(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |_, y| {
        if y < height / 2 {
            Rgb([20, 20, 20])
        } else {
            Rgb([230, 230, 230])
        }
    })
}

fn save(temp: &TempDir, name: &str, image: &RgbImage) -> assert_fs::fixture::ChildPath {
    let child = temp.child(name);
    image.save(child.path()).unwrap();
    child
}

fn quarantined(
    temp: &TempDir,
    incoming: &Path,
    existing: &Path,
    marker: &str,
    base: &str,
) -> PathBuf {
    temp.path().join(DEFAULT_QUARANTINE_DIR).join(format!(
        "{}_{}_{}",
        pair_tag(incoming, existing),
        marker,
        base
    ))
}

#[test]
fn smaller_copy_is_quarantined_and_keeper_stays() {
    let temp = TempDir::new().unwrap();
    let a = save(&temp, "a.png", &vertical_split(200, 150));
    let b = save(&temp, "b.png", &vertical_split(160, 120));
    let c = save(&temp, "c.png", &horizontal_split(200, 150));

    let result = Pipeline::builder().root(temp.path()).build().run().unwrap();

    assert_eq!(result.files_scanned, 3);
    assert_eq!(result.pairs.len(), 1);
    assert_eq!(result.images_indexed, 2);
    assert_eq!(result.pairs[0].winner, Winner::Existing);

    a.assert(predicate::path::exists());
    b.assert(predicate::path::missing());
    c.assert(predicate::path::exists());

    let gone = quarantined(&temp, b.path(), a.path(), "GONE", "b.png");
    let kept = quarantined(&temp, b.path(), a.path(), "KEPT", "a.png");
    assert!(gone.is_file(), "missing {}", gone.display());
    assert!(kept.is_file(), "missing {}", kept.display());
}

#[test]
fn larger_newcomer_wins() {
    let temp = TempDir::new().unwrap();
    let small = save(&temp, "a_small.png", &vertical_split(160, 120));
    let large = save(&temp, "b_large.png", &vertical_split(200, 150));

    let result = Pipeline::builder().root(temp.path()).build().run().unwrap();

    assert_eq!(result.pairs.len(), 1);
    assert_eq!(result.pairs[0].winner, Winner::Incoming);
    assert_eq!(result.pairs[0].keeper.path, large.path());
    large.assert(predicate::path::exists());
    small.assert(predicate::path::missing());
    temp.child(DEFAULT_QUARANTINE_DIR)
        .assert(predicate::path::is_dir());
}

#[test]
fn dry_run_touches_nothing() {
    let temp = TempDir::new().unwrap();
    let a = save(&temp, "a.png", &vertical_split(200, 150));
    let b = save(&temp, "b.png", &vertical_split(160, 120));

    let result = Pipeline::builder()
        .root(temp.path())
        .dry_run(true)
        .build()
        .run()
        .unwrap();

    assert!(result.dry_run);
    assert_eq!(result.pairs.len(), 1);
    assert!(!result.pairs[0].applied);
    a.assert(predicate::path::exists());
    b.assert(predicate::path::exists());
    temp.child(DEFAULT_QUARANTINE_DIR)
        .assert(predicate::path::missing());
}

#[test]
fn undo_restores_every_file() {
    let temp = TempDir::new().unwrap();
    let a = save(&temp, "a.png", &vertical_split(200, 150));
    let b = save(&temp, "b.png", &vertical_split(160, 120));
    let original_a = fs::read(a.path()).unwrap();
    let original_b = fs::read(b.path()).unwrap();

    Pipeline::builder().root(temp.path()).build().run().unwrap();
    b.assert(predicate::path::missing());

    let report = pipeline::undo(temp.path(), DEFAULT_QUARANTINE_DIR, false).unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(report.removed.len(), 1);
    assert_eq!(report.restored.len(), 1);
    assert!(report.directory_removed);
    assert_eq!(fs::read(a.path()).unwrap(), original_a);
    assert_eq!(fs::read(b.path()).unwrap(), original_b);
    temp.child(DEFAULT_QUARANTINE_DIR)
        .assert(predicate::path::missing());
}

#[test]
fn undo_dry_run_changes_nothing() {
    let temp = TempDir::new().unwrap();
    save(&temp, "a.png", &vertical_split(200, 150));
    let b = save(&temp, "b.png", &vertical_split(160, 120));

    Pipeline::builder().root(temp.path()).build().run().unwrap();
    let report = pipeline::undo(temp.path(), DEFAULT_QUARANTINE_DIR, true).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.restored.len(), 1);
    b.assert(predicate::path::missing());
    temp.child(DEFAULT_QUARANTINE_DIR)
        .assert(predicate::path::is_dir());
}

#[test]
fn existing_quarantine_directory_is_reused() {
    let temp = TempDir::new().unwrap();
    temp.child(DEFAULT_QUARANTINE_DIR).create_dir_all().unwrap();
    let leftover = temp.child(format!("{}/notes.txt", DEFAULT_QUARANTINE_DIR));
    leftover.write_str("kept by the user").unwrap();
    save(&temp, "a.png", &vertical_split(200, 150));
    let b = save(&temp, "b.png", &vertical_split(160, 120));

    let result = Pipeline::builder().root(temp.path()).build().run().unwrap();

    assert_eq!(result.pairs.len(), 1);
    b.assert(predicate::path::missing());
    leftover.assert("kept by the user");
}

#[test]
fn perceptual_sensitivity_controls_matching() {
    let strict = TempDir::new().unwrap();
    save(&strict, "a.png", &vertical_split(200, 150));
    let b = save(&strict, "b.png", &vertical_split(160, 120));

    // Negative sensitivity puts the ceiling below every possible score
    let result = Pipeline::builder()
        .root(strict.path())
        .algorithm(HashAlgorithmKind::Perceptual)
        .sensitivity(-1)
        .build()
        .run()
        .unwrap();
    assert!(result.pairs.is_empty());
    b.assert(predicate::path::exists());

    let tolerant = TempDir::new().unwrap();
    save(&tolerant, "a.png", &vertical_split(200, 150));
    let b = save(&tolerant, "b.png", &vertical_split(160, 120));

    let result = Pipeline::builder()
        .root(tolerant.path())
        .algorithm(HashAlgorithmKind::Perceptual)
        .sensitivity(10)
        .build()
        .run()
        .unwrap();
    assert_eq!(result.pairs.len(), 1);
    let score = result.pairs[0].score.unwrap();
    assert!((-100..=-90).contains(&score), "score {score}");
    b.assert(predicate::path::missing());
}

#[test]
fn corrupt_file_is_skipped() {
    let temp = TempDir::new().unwrap();
    let corrupt = temp.child("corrupt.jpg");
    corrupt.write_binary(b"this is not a valid image file").unwrap();
    save(&temp, "a.png", &vertical_split(200, 150));

    let result = Pipeline::builder().root(temp.path()).build().run().unwrap();

    assert_eq!(result.files_scanned, 2);
    assert_eq!(result.skipped.len(), 1);
    assert!(result.pairs.is_empty());
    corrupt.assert(predicate::path::exists());
}

#[test]
fn recursive_undo_restores_into_root() {
    let temp = TempDir::new().unwrap();
    temp.child("nested").create_dir_all().unwrap();
    save(&temp, "a.png", &vertical_split(200, 150));
    let nested = save(&temp, "nested/b.png", &vertical_split(160, 120));

    let flat = Pipeline::builder().root(temp.path()).build().run().unwrap();
    assert!(flat.pairs.is_empty());

    let result = Pipeline::builder()
        .root(temp.path())
        .recursive(true)
        .build()
        .run()
        .unwrap();
    assert_eq!(result.pairs.len(), 1);
    nested.assert(predicate::path::missing());

    pipeline::undo(temp.path(), DEFAULT_QUARANTINE_DIR, false).unwrap();

    // The name does not record sub-directories
    temp.child("b.png").assert(predicate::path::exists());
    nested.assert(predicate::path::missing());
}
