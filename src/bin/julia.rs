// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate image;
extern crate juliaset;
extern crate log;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use juliaset::config::{parse_complex, parse_key, parse_pair, DEFAULT_WORKERS};
use juliaset::{Config, Point, RenderContext, RenderError, WorkerPool};
use log::info;
use std::str::FromStr;
use std::time::{Duration, Instant};

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CONSTANT: &str = "constant";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const FRAMES: &str = "frames";
const ZOOM: &str = "zoom";
const NO_SMOOTHING: &str = "no-smoothing";
const KEY: &str = "key";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = (num_cpus::get() * 4).max(DEFAULT_WORKERS);

    App::new("julia")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Julia set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Write the last frame to this PNG file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1200x800")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse frame size"))
                .help("Size of the frame"),
        )
        .arg(
            Arg::with_name(CONSTANT)
                .required(false)
                .long(CONSTANT)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.8,0.4")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse the constant"))
                .help("The Julia constant, as re,im"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 100000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of render workers [default: 16]"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .required(false)
                .long(FRAMES)
                .short("f")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse frame count",
                        "Frame count must be between 1 and 1000000",
                    )
                })
                .help("Number of frames to render"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("1.0")
                .validator(move |s| {
                    validate_range(
                        &s,
                        0.01,
                        100.0,
                        "Could not parse zoom factor",
                        "Zoom factor must be between 0.01 and 100",
                    )
                })
                .help("Zoom factor applied toward the center between frames"),
        )
        .arg(
            Arg::with_name(NO_SMOOTHING)
                .long(NO_SMOOTHING)
                .help("Color by the integral iteration count"),
        )
        .arg(
            Arg::with_name(KEY)
                .required(false)
                .long(KEY)
                .short("k")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(|s| match parse_key(&s) {
                    Some(_) => Ok(()),
                    None => Err("Could not parse gradient key".to_string()),
                })
                .help("Gradient key as POSITION:RRGGBB[AA]; repeat for more keys"),
        )
        .get_matches()
}

// Validators have already run, so these only fail on a programming
// error in `args`.
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, RenderError> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| RenderError::InvalidArgument(format!("bad value for --{}", name)))
}

fn config(matches: &ArgMatches) -> Result<Config, RenderError> {
    let size = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair::<usize>(s, 'x'))
        .ok_or_else(|| RenderError::InvalidArgument("bad value for --size".to_string()))?;
    let constant = matches
        .value_of(CONSTANT)
        .and_then(parse_complex)
        .ok_or_else(|| RenderError::InvalidArgument("bad value for --constant".to_string()))?;
    let max_iterations = value(matches, ITERATIONS)?;
    let keys = match matches.values_of(KEY) {
        Some(keys) => keys.filter_map(parse_key).collect(),
        None => Config::default_keys(max_iterations),
    };
    let workers = match matches.value_of(THREADS) {
        Some(_) => value(matches, THREADS)?,
        None => DEFAULT_WORKERS,
    };
    let config = Config {
        workers,
        width: size.0,
        height: size.1,
        max_iterations,
        constant,
        smoothing: !matches.is_present(NO_SMOOTHING),
        keys,
        ..Config::default()
    };
    config.validate()?;
    Ok(config)
}

/// Counts frames and reports the rate about once a second.
struct FrameCounter {
    since: Instant,
    frames: u32,
}

impl FrameCounter {
    fn new() -> Self {
        FrameCounter {
            since: Instant::now(),
            frames: 0,
        }
    }

    fn tick(&mut self) -> Option<u32> {
        self.frames += 1;
        if self.since.elapsed() > Duration::from_secs(1) {
            let fps = self.frames;
            self.frames = 0;
            self.since = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let config = config(matches)?;
    let frames: u32 = value(matches, FRAMES)?;
    let zoom: f64 = value(matches, ZOOM)?;
    info!(
        "rendering {} frame(s) of {}x{} with {} workers",
        frames, config.width, config.height, config.workers
    );

    let context = RenderContext::new(&config)?;
    let mut pool = WorkerPool::spawn(context, config.workers, config.poll_interval)?;
    let focus = Point(config.width as f64 / 2.0, config.height as f64 / 2.0);
    let mut counter = FrameCounter::new();
    for frame in 0..frames {
        if frame > 0 && zoom != 1.0 {
            pool.context_mut()?.viewport.zoom_towards(focus, zoom);
        }
        pool.render_frame()?;
        if let Some(fps) = counter.tick() {
            info!("{} FPS", fps);
        }
    }

    if let Some(path) = matches.value_of(OUTPUT) {
        let rgba = pool.context()?.frame().to_rgba();
        image::save_buffer(
            path,
            &rgba,
            config.width as u32,
            config.height as u32,
            image::ColorType::Rgba8,
        )?;
        info!("wrote {}", path);
    }
    pool.shutdown();
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
