extern crate clap;
use acmi_tools::report::{render_metadata, render_table, OutFormat};
use acmi_tools::{Counter, Error};
use clap::{App, Arg};
use std::io::{stdout, Write};

/**
 * Reads an ACMI log (file or stdin) and prints per-pilot and per-formation event counts
 */
fn main() -> Result<(), Error> {
    let input_args = App::new("acmi-summary")
        .version(&acmi_tools::version()[..])
        .author("Joshua Vander Hook <josh@vanderhook.info>")
        .about(&acmi_tools::about()[..])
        .arg(
            Arg::with_name("input")
                .required(false)
                .help("ACMI text log to read. Reads stdin when absent or '-'"),
        )
        .arg(
            Arg::with_name("out_format")
                .required(false)
                .short("o")
                .default_value("wsv")
                .possible_values(&["wsv", "tsv", "csv", "vnl", "json"])
                .help("Output format which can be one of Vnlog or Whitespace-, Tab-, or Comma-seperated tables, or the whole result as JSON."),
        )
        .arg(
            Arg::with_name("sort")
                .required(false)
                .short("s")
                .takes_value(true)
                .help("Sort rows by this counter, highest first (Shots, Hits, Kills, Deaths, Takeoffs, Landings). Default is by name."),
        )
        .arg(
            Arg::with_name("metadata")
                .short("m")
                .help("Also print the log's header metadata"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("More logging on stderr; repeat for more. RUST_LOG works too."),
        )
        .get_matches();

    acmi_tools::init_logging(input_args.occurrences_of("verbose"));

    let sort = match input_args.value_of("sort") {
        Some(s) => Some(s.parse::<Counter>().map_err(Error::Argument)?),
        None => None,
    };

    let text = acmi_tools::read_input(input_args.value_of("input"))?;
    if text.trim().is_empty() {
        return Err(Error::NoInput);
    }
    let stats = acmi_tools::parse(&text);
    eprintln!(
        "Processed. Read: {} pilots and {} formations",
        stats.pilots.len(),
        stats.formations.len()
    );

    let out = stdout();
    let mut out = out.lock();
    let format_name = input_args.value_of("out_format").unwrap_or("wsv");
    if format_name == "json" {
        serde_json::to_writer_pretty(&mut out, &stats)?;
        writeln!(out).unwrap_or(());
        return Ok(());
    }
    let format = format_name.parse::<OutFormat>().map_err(Error::Argument)?;

    if input_args.is_present("metadata") {
        for line in render_metadata(&stats.metadata) {
            writeln!(out, "{}{}", format.header_start(), line).unwrap_or(());
        }
        writeln!(out).unwrap_or(());
    }
    for line in render_table("pilot", &stats.pilots, format, sort) {
        writeln!(out, "{}", line).unwrap_or(());
    }
    writeln!(out).unwrap_or(());
    for line in render_table("group", &stats.formations, format, sort) {
        writeln!(out, "{}", line).unwrap_or(());
    }

    Ok(())
}
