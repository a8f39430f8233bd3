use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use android_asset_generator::asset_generator::{AssetServiceState, Density, OutputFormat};
use android_asset_generator::storage;
use base64::Engine;
use image::{ImageFormat, Rgba, RgbaImage};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{}-{}-{}", prefix, std::process::id(), nanos))
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, if x < width / 2 { 255 } else { 96 }])
    });
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .expect("png encoding should succeed");
    out.into_inner()
}

fn archive_entries(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("valid zip");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_string())
        .collect()
}

#[tokio::test]
async fn base_image_produces_every_density_on_disk() {
    let root = unique_temp_dir("export-flow-all");
    fs::create_dir_all(&root).expect("create root");
    let input = root.join("icon.png");
    fs::write(&input, png_bytes(192, 192)).expect("write input");

    let service = AssetServiceState::new();
    let summaries = service
        .load_file(&input.to_string_lossy())
        .await
        .expect("load should succeed");

    let sizes: Vec<(String, u32)> = summaries
        .iter()
        .map(|summary| (summary.density.to_string(), summary.width))
        .collect();
    assert_eq!(
        sizes,
        vec![
            ("mdpi".to_string(), 48),
            ("hdpi".to_string(), 72),
            ("xhdpi".to_string(), 96),
            ("xxhdpi".to_string(), 144),
            ("xxxhdpi".to_string(), 192),
        ]
    );

    let out = root.join("out");
    let summary = storage::export_assets(&service.rendered_assets(), &out).expect("export");
    assert_eq!(summary.file_count, 5);
    for density in Density::ALL {
        let path = out.join(OutputFormat::Png.entry_path(density));
        let written = image::open(&path).expect("written asset should decode");
        let (expected_w, expected_h) = density.target_size(192, 192);
        assert_eq!((written.width(), written.height()), (expected_w, expected_h));
    }

    let archive = service.build_archive().expect("archive");
    storage::export_archive(&archive, &out).expect("archive export");
    let zip_bytes = fs::read(out.join("android-assets.zip")).expect("zip on disk");
    assert_eq!(
        archive_entries(&zip_bytes),
        vec![
            "drawable-mdpi/asset.png",
            "drawable-hdpi/asset.png",
            "drawable-xhdpi/asset.png",
            "drawable-xxhdpi/asset.png",
            "drawable-xxxhdpi/asset.png",
        ]
    );

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn jpeg_selection_only_archives_chosen_densities() {
    let data = base64::engine::general_purpose::STANDARD.encode(png_bytes(96, 64));
    let service = AssetServiceState::new();

    service
        .select_densities(&["xhdpi", "mdpi"])
        .await
        .expect("selection without source is accepted");
    service
        .set_output_format("jpeg")
        .await
        .expect("format change without source is accepted");
    assert!(service.list_assets().is_empty());

    let summaries = service
        .load_base64(&format!("data:image/png;base64,{data}"))
        .await
        .expect("load should succeed");
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|summary| summary.mime_type == "image/jpeg"));

    let set = service.rendered_assets();
    let mdpi = set.get(Density::Mdpi).expect("mdpi rendered");
    assert_eq!((mdpi.width, mdpi.height), (24, 16));
    assert_eq!(infer::get(&mdpi.bytes).map(|kind| kind.mime_type()), Some("image/jpeg"));

    let archive = service.build_archive().expect("archive");
    assert_eq!(
        archive_entries(&archive.bytes),
        vec!["drawable-mdpi/asset.jpeg", "drawable-xhdpi/asset.jpeg"]
    );
}

#[tokio::test]
async fn rejected_upload_keeps_previous_results() {
    let service = AssetServiceState::new();
    let data = base64::engine::general_purpose::STANDARD.encode(png_bytes(32, 32));
    service.load_base64(&data).await.expect("first load");
    let before = service.rendered_assets();

    let gif = base64::engine::general_purpose::STANDARD.encode(b"GIF89a\x01\x00\x01\x00\x00\x00\x00;");
    let err = service.load_base64(&gif).await.expect_err("gif must be rejected");
    assert_eq!(err.code(), "E_INVALID_FORMAT");

    let after = service.rendered_assets();
    assert_eq!(after.generation(), before.generation());
    assert_eq!(after.densities(), before.densities());
    assert_eq!(service.status(), "idle");
}

#[tokio::test]
async fn deselecting_everything_leaves_an_empty_archive() {
    let service = AssetServiceState::new();
    let data = base64::engine::general_purpose::STANDARD.encode(png_bytes(64, 64));
    service.load_base64(&data).await.expect("load");

    let empty: [&str; 0] = [];
    let summaries = service.select_densities(&empty).await.expect("deselect all");
    assert!(summaries.is_empty());

    let archive = service.build_archive().expect("archive");
    assert!(archive.entries.is_empty());
    assert!(archive_entries(&archive.bytes).is_empty());
}
