use super::*;
use image::Rgb;
use tempfile::TempDir;

const PAGE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PcGts xmlns="http://schema.primaresearch.org/PAGE/gts/pagecontent/2013-07-15">
  <Page imageFilename="page.png" imageWidth="200" imageHeight="200">
    <TextRegion id="r0">
      <Property key="entity" value="signature"/>
      <Coords points="10,10 110,10 110,110 10,110"/>
    </TextRegion>
  </Page>
</PcGts>
"#;

const REGION: Rect = Rect {
    left: 10,
    top: 10,
    right: 110,
    bottom: 110,
};

struct Fixture {
    dir: TempDir,
    documents: Vec<PathBuf>,
    sources: Vec<PathBuf>,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    RgbImage::from_pixel(200, 200, Rgb([250, 248, 240]))
        .save(root.join("page.png"))
        .unwrap();
    std::fs::write(root.join("page.xml"), PAGE_XML).unwrap();

    RgbImage::from_fn(300, 150, |x, y| {
        if (x / 10 + y / 10) % 2 == 0 {
            Rgb([20, 20, 90])
        } else {
            Rgb([255, 255, 255])
        }
    })
    .save(root.join("sig1.png"))
    .unwrap();
    RgbImage::from_pixel(80, 120, Rgb([0, 0, 0]))
        .save(root.join("sig2.png"))
        .unwrap();

    Fixture {
        documents: vec![root.join("page.xml")],
        sources: vec![root.join("sig1.png"), root.join("sig2.png")],
        dir,
    }
}

fn request(f: &Fixture, placement: Placement, count: usize, out: &str) -> DatasetRequest {
    DatasetRequest {
        documents: f.documents.clone(),
        sources: f.sources.clone(),
        placement,
        count,
        outdir: f.dir.path().join(out),
    }
}

#[test]
fn output_name_is_zero_padded() {
    assert_eq!(output_name(Placement::Left, 7), "left-00007.png");
    assert_eq!(
        output_name(Placement::LeftRight, 12345),
        "left_right-12345.png"
    );
    assert_eq!(output_name(Placement::Centre, 0), "centre-00000.png");
}

#[test]
fn read_list_skips_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("list.txt");
    std::fs::write(&list, "a.xml\n\nb.xml  \nsub/c.xml\n").unwrap();
    assert_eq!(
        read_list(&list).unwrap(),
        vec![
            PathBuf::from("a.xml"),
            PathBuf::from("b.xml"),
            PathBuf::from("sub/c.xml")
        ]
    );
    assert!(read_list(dir.path().join("missing.txt")).is_err());
}

#[test]
fn generate_centre_writes_images_and_manifest() {
    let f = fixture();
    let req = request(&f, Placement::Centre, 3, "out");
    let report = generate_dataset(&req, &AppConfig::default()).unwrap();

    assert_eq!(report.skipped, 0);
    assert_eq!(report.written.len(), 3);
    for (i, path) in report.written.iter().enumerate() {
        assert_eq!(path, &req.outdir.join(format!("centre-{i:05}.png")));
        let img = image::open(path).unwrap();
        assert_eq!((img.width(), img.height()), (200, 200));
    }

    for entry in &report.manifest {
        assert_eq!(entry.placement, "centre");
        assert_eq!(entry.regions.len(), 1);
        let rect = entry.regions[0];
        assert!(rect.is_within(&REGION), "{rect:?}");
        assert!(rect.dim().width <= 100 && rect.dim().height <= 100);
    }

    let manifest: serde_json::Value =
        serde_json::from_reader(File::open(req.outdir.join(MANIFEST_FILE)).unwrap()).unwrap();
    let entries = manifest.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["file"], "centre-00000.png");
    assert_eq!(entries[0]["regions"][0]["left"], report.manifest[0].regions[0].left);
}

#[test]
fn generate_is_reproducible_for_a_seed() {
    let f = fixture();
    let config = AppConfig {
        seed: 1234,
        ..AppConfig::default()
    };
    let a = generate_dataset(&request(&f, Placement::TopBottom, 4, "a"), &config).unwrap();
    let b = generate_dataset(&request(&f, Placement::TopBottom, 4, "b"), &config).unwrap();

    assert_eq!(a.manifest.len(), b.manifest.len());
    for (x, y) in a.manifest.iter().zip(&b.manifest) {
        assert_eq!(x.regions, y.regions);
    }
    for (pa, pb) in a.written.iter().zip(&b.written) {
        assert_eq!(std::fs::read(pa).unwrap(), std::fs::read(pb).unwrap());
    }
}

#[test]
fn generate_left_right_fills_both_halves() {
    let f = fixture();
    let report = generate_dataset(
        &request(&f, Placement::LeftRight, 2, "lr"),
        &AppConfig::default(),
    )
    .unwrap();

    for entry in &report.manifest {
        assert_eq!(entry.regions.len(), 2);
        assert!(entry.regions[0].is_within(&REGION.left_half()));
        assert!(entry.regions[1].is_within(&REGION.right_half()));
    }
}

#[test]
fn generate_only_touches_the_left_half() {
    let f = fixture();
    let req = request(&f, Placement::Left, 1, "left");
    generate_dataset(&req, &AppConfig::default()).unwrap();

    let original = image::open(f.dir.path().join("page.png")).unwrap().to_rgb8();
    let out = image::open(req.outdir.join("left-00000.png"))
        .unwrap()
        .to_rgb8();
    let left = REGION.left_half();
    for (x, y, p) in out.enumerate_pixels() {
        let (xi, yi) = (x as i32, y as i32);
        if !(xi >= left.left && xi < left.right && yi >= left.top && yi < left.bottom) {
            assert_eq!(p, original.get_pixel(x, y), "pixel ({x}, {y}) changed");
        }
    }
}

#[test]
fn abort_policy_stops_on_bad_document() {
    let f = fixture();
    let mut req = request(&f, Placement::Centre, 2, "abort");
    req.documents = vec![f.dir.path().join("missing.xml")];

    let err = generate_dataset(&req, &AppConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("missing.xml"));
}

#[test]
fn skip_policy_continues_past_bad_documents() {
    let f = fixture();
    let config = AppConfig {
        on_error: OnError::Skip,
        ..AppConfig::default()
    };

    let mut req = request(&f, Placement::Centre, 3, "skip");
    req.documents = vec![f.dir.path().join("missing.xml")];
    let report = generate_dataset(&req, &config).unwrap();
    assert_eq!(report.skipped, 3);
    assert!(report.written.is_empty());
    assert!(req.outdir.join(MANIFEST_FILE).exists());

    let mut req = request(&f, Placement::Centre, 3, "skip_sources");
    req.sources = vec![f.dir.path().join("nope.png")];
    let report = generate_dataset(&req, &config).unwrap();
    assert_eq!(report.skipped, 3);
}

#[test]
fn unmatched_selector_is_an_error() {
    let f = fixture();
    let config = AppConfig {
        selector: "entity=stamp".parse().unwrap(),
        ..AppConfig::default()
    };
    let err = generate_dataset(&request(&f, Placement::Centre, 1, "sel"), &config).unwrap_err();
    assert!(format!("{err:#}").contains("entity=stamp"));
}

#[test]
fn empty_inputs_are_rejected() {
    let f = fixture();
    let mut req = request(&f, Placement::Centre, 1, "empty");
    req.sources.clear();
    assert!(generate_dataset(&req, &AppConfig::default()).is_err());

    let mut req = request(&f, Placement::Centre, 1, "empty");
    req.documents.clear();
    assert!(generate_dataset(&req, &AppConfig::default()).is_err());
}

#[test]
fn debug_draw_outlines_target_region() {
    let f = fixture();
    let config = AppConfig {
        debug_draw: true,
        ..AppConfig::default()
    };
    let req = request(&f, Placement::Centre, 1, "debug");
    generate_dataset(&req, &config).unwrap();

    let out = image::open(req.outdir.join("centre-00000.png"))
        .unwrap()
        .to_rgb8();
    // The region polygon is drawn last, over the bounding box.
    assert_eq!(out.get_pixel(10, 10), &Rgb([0, 0, 255]));
    assert_eq!(out.get_pixel(60, 110), &Rgb([0, 0, 255]));
}

#[test]
fn debug_draw_traces_polygon_inside_bbox() {
    let f = fixture();
    let xml = PAGE_XML.replace(
        "10,10 110,10 110,110 10,110",
        "10,10 110,10 110,110 60,110 10,60",
    );
    let cut = f.dir.path().join("cut.xml");
    std::fs::write(&cut, xml).unwrap();

    let config = AppConfig {
        debug_draw: true,
        ..AppConfig::default()
    };
    let mut req = request(&f, Placement::Centre, 1, "debug_cut");
    req.documents = vec![cut];
    generate_dataset(&req, &config).unwrap();

    let out = image::open(req.outdir.join("centre-00000.png"))
        .unwrap()
        .to_rgb8();
    // Bbox corner outside the polygon keeps the green outline.
    assert_eq!(out.get_pixel(10, 110), &Rgb([0, 255, 0]));
    // Cut edge from (60,110) to (10,60).
    assert_eq!(out.get_pixel(35, 85), &Rgb([0, 0, 255]));
}

#[test]
fn abort_keeps_manifest_in_sync_with_written_images() {
    let f = fixture();
    let documents = vec![f.dir.path().join("page.xml"), f.dir.path().join("missing.xml")];

    let mut checked = false;
    for seed in 0..64 {
        let mut req = request(&f, Placement::Centre, 10, &format!("partial_{seed}"));
        req.documents = documents.clone();
        std::fs::create_dir_all(&req.outdir).unwrap();
        std::fs::write(req.outdir.join(MANIFEST_FILE), "[\"stale\"]").unwrap();

        let config = AppConfig {
            seed,
            ..AppConfig::default()
        };
        if generate_dataset(&req, &config).is_ok() {
            continue;
        }

        let mut written: Vec<String> = std::fs::read_dir(&req.outdir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".png"))
            .collect();
        written.sort();
        if written.is_empty() {
            continue;
        }

        let manifest: serde_json::Value =
            serde_json::from_reader(File::open(req.outdir.join(MANIFEST_FILE)).unwrap())
                .unwrap();
        let labelled: Vec<String> = manifest
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["file"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(labelled, written, "seed {seed}");
        checked = true;
        break;
    }
    assert!(checked, "no seed aborted after writing an image");
}
