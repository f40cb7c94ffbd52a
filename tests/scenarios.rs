// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate juliaset;
extern crate num;
extern crate rand;

use juliaset::frame::row_range;
use juliaset::planes::Pixel;
use juliaset::{
    escape, render_single, Color, Config, Domain, Gradient, PlaneMapper, RenderContext,
    WorkerPool,
};
use num::Complex;
use rand::seq::SliceRandom;
use std::time::Duration;

fn four_key_gradient(max: f64) -> Gradient {
    let mut gradient = Gradient::new(Domain::new(0.0, max));
    gradient.add_key(0.0, Color::WHITE);
    gradient.add_key(max / 3.0, Color::RED);
    gradient.add_key(2.0 * max / 3.0, Color::GREEN);
    gradient.add_key(max, Color::BLUE);
    gradient
}

#[test]
fn gradient_over_one_hundred_iterations() {
    let gradient = four_key_gradient(100.0);
    assert_eq!(gradient.color_at(0.0), Color::WHITE);
    assert_eq!(gradient.color_at(100.0), Color::BLUE);
    let middle = gradient.color_at(50.0);
    assert!((i32::from(middle.r) - 127).abs() <= 1);
    assert!((i32::from(middle.g) - 127).abs() <= 1);
    assert_eq!((middle.b, middle.a), (0, 255));
}

#[test]
fn shuffled_insertions_stay_sorted() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let mut positions: Vec<f64> = (0..12).map(|i| f64::from(i % 7) * 10.0).collect();
        positions.shuffle(&mut rng);
        let mut gradient = Gradient::new(Domain::new(0.0, 60.0));
        for &position in &positions {
            gradient.add_key(position, Color::BLACK);
        }
        assert!(gradient
            .keys()
            .windows(2)
            .all(|pair| pair[0].position <= pair[1].position));
    }
}

#[test]
fn four_workers_split_eight_rows_evenly() {
    let ranges: Vec<_> = (0..4).map(|k| row_range(k, 4, 8)).collect();
    assert_eq!(ranges, vec![0..2, 2..4, 4..6, 6..8]);
}

#[test]
fn one_worker_two_by_two_matches_direct_evaluation() {
    let config = Config {
        workers: 1,
        width: 2,
        height: 2,
        ..Config::default()
    };
    let context = RenderContext::new(&config).unwrap();
    let mut pool = WorkerPool::spawn(context, 1, Duration::from_millis(5)).unwrap();
    pool.render_frame().unwrap();

    let context = pool.context().unwrap();
    let mapper = PlaneMapper::new(&context.viewport, 2, 2);
    for y in 0..2 {
        for x in 0..2 {
            let z = mapper.pixel_to_point(&Pixel(x, y));
            let expected = escape::shade(z, context.params(), &context.gradient);
            assert_eq!(context.frame().pixel(x, y), expected.to_bytes());
        }
    }
    assert_eq!(context.frame().to_rgba(), render_single(&context));
}

#[test]
fn default_setup_matches_the_reference() {
    let config = Config {
        width: 120,
        height: 80,
        ..Config::default()
    };
    let context = RenderContext::new(&config).unwrap();
    let mut pool = WorkerPool::spawn(context, config.workers, config.poll_interval).unwrap();
    pool.render_frame().unwrap();
    {
        let context = pool.context().unwrap();
        assert_eq!(context.frame().to_rgba(), render_single(&context));
    }

    // Captive points land on the last key.
    pool.context_mut()
        .unwrap()
        .set_constant(Complex::new(0.0, 0.0));
    pool.render_frame().unwrap();
    let context = pool.context().unwrap();
    assert_eq!(context.frame().pixel(60, 40), Color::BLUE.to_bytes());
}
