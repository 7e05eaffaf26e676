use image::Rgba;
use lightpaint::{
    BOARD_BLACK, Canvas, Color, ColorScheme, EditOutcome, Error, LayerGroup, Operation,
    PipelineConfig,
    PixelBuffer, SIMULATED_METAL, Session, fabricate, is_marker_pixel, mask_name, quantize,
    region_fill,
};

fn labels_of(palette: &lightpaint::Palette, buffer: &PixelBuffer) -> Vec<String> {
    buffer
        .as_image()
        .pixels()
        .map(|px| {
            let color = Color::new(px[0], px[1], px[2]);
            let idx = palette.position_of(color).expect("pixel is a palette color");
            palette.entries()[idx].label.clone()
        })
        .collect()
}

#[test]
fn two_by_two_quantizes_to_black_and_white() {
    let palette = lightpaint::Palette::new([
        ("black", Color::new(0, 0, 0)),
        ("white", Color::new(255, 255, 255)),
    ])
    .unwrap();
    let source = PixelBuffer::from_colors(
        2,
        2,
        &[
            Color::new(10, 10, 10),
            Color::new(250, 250, 250),
            Color::new(0, 0, 0),
            Color::new(200, 200, 200),
        ],
    )
    .unwrap();

    let quantized = quantize(&source, &palette).unwrap();
    assert_eq!(labels_of(&palette, &quantized), ["black", "white", "black", "white"]);
}

#[test]
fn fill_recolors_whole_uniform_buffer() {
    let mut buffer = PixelBuffer::from_colors(3, 3, &[Color::new(0, 0, 0); 9]).unwrap();
    let outcome = region_fill(&mut buffer, 1, 1, Color::new(255, 255, 255), 0.0).unwrap();
    assert_eq!(outcome, EditOutcome::Changed(9));
    assert!(buffer.as_image().pixels().all(|px| *px == Rgba([255, 255, 255, 255])));
}

/// A 12×8 image: left half near-black, right half near-white, with a
/// light-blue square in the middle.
fn sample_source() -> PixelBuffer {
    let mut colors = Vec::new();
    for y in 0..8u32 {
        for x in 0..12u32 {
            let c = if (4..8).contains(&x) && (2..6).contains(&y) {
                Color::new(90, 170, 220)
            } else if x < 6 {
                Color::new(10, 14, 12)
            } else {
                Color::new(225, 230, 232)
            };
            colors.push(c);
        }
    }
    PixelBuffer::from_colors(12, 8, &colors).unwrap()
}

#[test]
fn session_end_to_end() {
    let config = PipelineConfig::default();
    let mut session = Session::new(config.clone(), sample_source());
    session.simplify(ColorScheme::Blue.palette()).unwrap();
    let palette = session.palette().unwrap().clone();

    // Paint a white dot, then take it back.
    let before = session.simplified().unwrap().clone();
    let white = palette.get("white").unwrap();
    session
        .apply(Canvas::Simplified, Operation::Stamp { x: 1, y: 4, color: white, diameter: 1 })
        .unwrap();
    assert!(session.undo(Canvas::Simplified).unwrap());
    assert_eq!(session.simplified().unwrap(), &before);
    assert!(!session.undo(Canvas::Simplified).unwrap());

    // Turn the whole dark half into white silkscreen except the square.
    let outcome = session
        .apply(
            Canvas::Simplified,
            Operation::Fill { x: 0, y: 0, color: white, tolerance: 0.0 },
        )
        .unwrap();
    assert_eq!(outcome, EditOutcome::Changed(6 * 8 - 2 * 4));

    let out = session.fabricate().unwrap();
    assert_eq!(out.masks.len(), palette.len());
    assert_eq!(out.masks[0].name, mask_name("dark_blue"));
    assert_eq!(out.masks[0].file_name(), "mask_dark_blue.png");

    // No black or dark pixels remain, so only the copper and silkscreen
    // layers survive.
    let layer_names: Vec<&str> = out.layers.iter().map(|l| l.export_name.as_str()).collect();
    assert_eq!(layer_names, ["front layer", "front silkscreen layer"]);
    assert_eq!(out.preview.file_name(), "preview.png");
}

#[test]
fn masks_partition_the_quantized_image() {
    let config = PipelineConfig::default();
    let palette = ColorScheme::Blue.palette();
    let quantized = quantize(&sample_source(), &palette).unwrap();
    let out = fabricate(&quantized, &palette, &config).unwrap();

    let (w, h) = quantized.dimensions();
    for y in 0..h {
        for x in 0..w {
            if is_marker_pixel((w, h), config.marker_size, x, y) {
                continue;
            }
            let owners = out
                .masks
                .iter()
                .filter(|m| m.buffer.pixel(x, y)[3] != 0)
                .count();
            assert_eq!(owners, 1, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn off_palette_edits_cannot_break_the_partition() {
    let config = PipelineConfig::default();
    let mut session = Session::new(config.clone(), sample_source());
    session.simplify(ColorScheme::Blue.palette()).unwrap();

    let stray = Operation::Stamp { x: 4, y: 4, color: Color::new(1, 2, 3), diameter: 1 };
    assert!(matches!(
        session.apply(Canvas::Simplified, stray),
        Err(Error::ColorNotInPalette(_))
    ));

    let out = session.fabricate().unwrap();
    let owners = out.masks.iter().filter(|m| m.buffer.pixel(4, 4)[3] != 0).count();
    assert_eq!(owners, 1);

    // A buffer edited outside the session is refused at mask generation.
    let palette = session.palette().unwrap().clone();
    let mut quantized = session.simplified().unwrap().clone();
    quantized.put_pixel(4, 4, Rgba([1, 2, 3, 255]));
    assert!(matches!(
        fabricate(&quantized, &palette, &config),
        Err(Error::UnclaimedPixel { x: 4, y: 4, .. })
    ));
}

#[test]
fn empty_layers_are_omitted() {
    let mut config = PipelineConfig::default();
    config.marker_size = 0;
    config.layer_groups = vec![
        LayerGroup::new("front_silkscreen", ["white"]),
        LayerGroup::new("bottom_solder_mask", ["dark_blue", "dark_green"]),
    ];
    let palette = ColorScheme::Blue.palette();
    let quantized = quantize(&sample_source(), &palette).unwrap();

    let out = fabricate(&quantized, &palette, &config).unwrap();
    assert_eq!(out.layers.len(), 1);
    assert_eq!(out.layers[0].export_name, "front silkscreen layer");
}

#[test]
fn preview_swaps_board_black_for_metal() {
    let config = PipelineConfig::default();
    let palette = ColorScheme::Blue.palette();
    let quantized = quantize(&sample_source(), &palette).unwrap();
    assert_eq!(quantized.color_at(0, 0), BOARD_BLACK);

    let out = fabricate(&quantized, &palette, &config).unwrap();
    assert_eq!(out.preview.buffer.color_at(0, 0), SIMULATED_METAL);
    assert_eq!(out.preview.buffer.color_at(11, 0), quantized.color_at(11, 0));
    assert_eq!(quantized.color_at(0, 0), BOARD_BLACK);
}
