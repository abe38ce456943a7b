#![forbid(unsafe_code)]

mod show;
mod stdout;

use clap::{App, Arg};
use log::LevelFilter;
use std::process;
use stdout::PedanticLogger;

fn main() {
    let matches = App::new("id3read")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Print the ID3v2.3 tags of MP3 files")
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log how each tag is being read"),
        )
        .arg(
            Arg::with_name("frame")
                .short("f")
                .long("frame")
                .value_name("ID")
                .help("Only show frames with this id, like TIT2")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("files")
                .value_name("FILE")
                .help("The files to read")
                .required(true)
                .multiple(true),
        )
        .get_matches();

    if matches.is_present("verbose") {
        PedanticLogger::setup(LevelFilter::Debug);
    } else {
        PedanticLogger::setup(LevelFilter::Info);
    }

    let filter: Vec<&str> = matches
        .values_of("frame")
        .map(Iterator::collect)
        .unwrap_or_default();

    // Clap exits by itself if no files were given.
    if let Some(paths) = matches.values_of("files") {
        if !show::show(paths, &filter) {
            process::exit(1);
        }
    }
}
