#![cfg(test)]

use crate::grayscale::{self, GrayscaleMode};
use crate::histogram::{self, accumulate_slice};
use crate::pipeline::{process, ImageRequest, ProcessOptions};
use crate::render::{self, RenderSpec, DEFAULT_FILL, TRANSPARENT};
use crate::PixelBuffer;
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn random_rgba(rng: &mut StdRng, width: u32, height: u32) -> Vec<u8> {
    (0..width as usize * height as usize * 4)
        .map(|_| rng.gen::<u8>())
        .collect()
}

#[test]
fn test_histogram_sums_to_pixel_count() {
    let mut rng = StdRng::seed_from_u64(7);
    for (w, h) in [(1, 1), (17, 3), (64, 64), (300, 1)] {
        let pixels = PixelBuffer::new(w, h, random_rgba(&mut rng, w, h)).unwrap();
        for mode in GrayscaleMode::all() {
            let hist = histogram::accumulate(&grayscale::convert_with(&pixels, *mode));
            assert_eq!(hist.total(), u64::from(w * h));
        }
    }
}

#[test]
fn test_shuffled_intensities_give_same_histogram() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut values: Vec<u8> = (0..10_000).map(|_| rng.gen()).collect();
    let before = accumulate_slice(&values);
    values.shuffle(&mut rng);
    assert_eq!(accumulate_slice(&values), before);
}

#[test]
fn test_large_image_takes_parallel_path() {
    // 640x480 crosses the rayon threshold
    let mut rng = StdRng::seed_from_u64(3);
    let pixels = PixelBuffer::new(640, 480, random_rgba(&mut rng, 640, 480)).unwrap();
    let intensities = grayscale::convert(&pixels);

    let expected: Vec<u8> = pixels.as_bytes().chunks_exact(4).map(|px| px[0]).collect();
    assert_eq!(intensities.as_slice(), expected.as_slice());

    let hist = histogram::accumulate(&intensities);
    let mut sequential = [0u64; 256];
    for v in expected {
        sequential[v as usize] += 1;
    }
    assert_eq!(hist.bins(), &sequential);
}

#[test]
fn test_matches_imageproc_histogram() {
    let mut rng = StdRng::seed_from_u64(11);
    let gray = GrayImage::from_fn(50, 40, |_, _| Luma([rng.gen::<u8>()]));
    let rgba = DynamicImage::ImageLuma8(gray.clone()).to_rgba8();

    let pixels = PixelBuffer::from_image(&DynamicImage::ImageRgba8(rgba));
    let ours = histogram::accumulate(&grayscale::convert(&pixels));
    let oracle = imageproc::stats::histogram(&gray);

    for (bin, &count) in oracle.channels[0].iter().enumerate() {
        assert_eq!(ours.count(bin as u8), u64::from(count), "bin {}", bin);
    }
}

#[test]
fn test_all_black_image_gives_single_full_bar() {
    let image = RgbaImage::from_pixel(8, 5, Rgba([0, 120, 200, 255]));
    let out = process(
        ImageRequest::from_image(&DynamicImage::ImageRgba8(image)),
        &ProcessOptions::default(),
    )
    .unwrap();

    assert_eq!(out.histogram.count(0), 40);
    assert_eq!(out.histogram.total(), 40);

    let heights = render::bar_heights(&out.histogram, 5);
    assert_eq!(heights[0], 5);
    assert!(heights[1..].iter().all(|&h| h == 0));

    for y in 0..5 {
        assert_eq!(out.bitmap.pixel(0, y), Some(DEFAULT_FILL));
        assert_eq!(out.bitmap.pixel(1, y), Some(TRANSPARENT));
    }
}

#[test]
fn test_empty_image_renders_blank() {
    for (w, h) in [(0, 0), (0, 12), (12, 0)] {
        let out = process(ImageRequest::rgba(Vec::new(), w, h), &ProcessOptions::default()).unwrap();
        assert!(out.histogram.is_degenerate());
        assert_eq!(out.bitmap.height(), h);
        assert!(out.bitmap.as_bytes().iter().all(|&b| b == 0));
    }
}

#[test]
fn test_malformed_buffer_is_rejected() {
    let err = process(ImageRequest::rgba(vec![0; 7], 7, 1), &ProcessOptions::default()).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_FORMAT");

    // Aligned but inconsistent with the declared size
    let err = process(ImageRequest::rgba(vec![0; 8], 3, 1), &ProcessOptions::default()).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_FORMAT");
}

#[test]
fn test_luma_mode_sees_colour() {
    // Pure green reads as black from the red channel but mid-gray as luma
    let data = [0u8, 255, 0, 255].repeat(4);
    let red = process(ImageRequest::rgba(data.clone(), 2, 2), &ProcessOptions::default()).unwrap();
    assert_eq!(red.histogram.count(0), 4);

    let options = ProcessOptions {
        mode: GrayscaleMode::Luma,
        render: RenderSpec::default(),
    };
    let luma = process(ImageRequest::rgba(data, 2, 2), &options).unwrap();
    assert_eq!(luma.histogram.count(150), 4);
}

#[test]
fn test_exported_png_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("histogram.png");

    let spec = RenderSpec::new(2, [10, 20, 30, 255]).unwrap();
    let bitmap = render::render(&accumulate_slice(&[0, 0, 128]), 6, &spec);
    bitmap.save_png(&path).unwrap();

    let reloaded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(reloaded.dimensions(), (512, 6));
    assert_eq!(reloaded.as_raw(), bitmap.as_bytes());
}
