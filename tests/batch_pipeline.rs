use std::path::PathBuf;

use gridart::{BatchConfig, ErrorKind, Palette, ResvgRasterizer, run};

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("batch_pipeline").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn bauhaus_batch_writes_images_and_captions() {
    let dir = scratch("bauhaus");
    let palette = Palette::parse(&["#FF0000", "#0000FF"]).unwrap();
    let cfg = BatchConfig::new("Bauhaus", palette, &dir).with_count(2);

    let res = run(&cfg, &mut ResvgRasterizer::new()).unwrap();
    assert_eq!(res.items_completed, 2);
    assert_eq!(res.total, 2);

    for i in 0..2 {
        let img = image::open(cfg.image_path(i)).unwrap();
        assert_eq!((img.width(), img.height()), (1024, 1024));

        let caption = std::fs::read_to_string(cfg.caption_path(i)).unwrap();
        assert!(caption.starts_with("Bauhaus, an abstract composition of "));
        assert!(caption.contains("in colors #FF0000, #0000FF"));
        assert!(caption.ends_with(", Bauhaus"));
    }

    let mut names: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        [
            "vector_art_0.png",
            "vector_art_0.txt",
            "vector_art_1.png",
            "vector_art_1.txt"
        ]
    );
}

#[test]
fn background_covers_the_whole_image() {
    let dir = scratch("opaque");
    let cfg = BatchConfig::new("Mono", Palette::parse(&["#00FF00"]).unwrap(), &dir)
        .with_count(1)
        .with_canvas_size(64);
    run(&cfg, &mut ResvgRasterizer::new()).unwrap();

    let img = image::open(cfg.image_path(0)).unwrap().to_rgba8();
    // Same-color antialiased edges may round by a step or two.
    assert!(img.pixels().all(|p| {
        let [r, g, b, a] = p.0;
        a == 255 && g >= 250 && r <= 5 && b <= 5
    }));
}

#[test]
fn zero_count_is_an_empty_success() {
    let dir = scratch("zero");
    let cfg = BatchConfig::new("x", Palette::parse(&["#000000"]).unwrap(), &dir).with_count(0);
    let res = run(&cfg, &mut ResvgRasterizer::new()).unwrap();
    assert_eq!((res.items_completed, res.total), (0, 0));
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
}

#[test]
fn missing_output_location_fails_before_generating() {
    struct MustNotRun;
    impl gridart::Rasterizer for MustNotRun {
        fn rasterize(
            &mut self,
            _: &std::path::Path,
            _: u32,
        ) -> gridart::GridArtResult<gridart::RasterImage> {
            panic!("rasterizer invoked despite invalid input");
        }
    }

    let dir = scratch("missing").join("does_not_exist");
    let cfg = BatchConfig::new("x", Palette::parse(&["#000000"]).unwrap(), &dir).with_count(3);
    let err = run(&cfg, &mut MustNotRun).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.failed_index(), None);
    assert!(!dir.exists());
}

#[test]
fn blank_trigger_is_invalid_input() {
    let dir = scratch("blank_trigger");
    let cfg = BatchConfig::new("   ", Palette::parse(&["#000000"]).unwrap(), &dir).with_count(1);
    let err = run(&cfg, &mut ResvgRasterizer::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
}
