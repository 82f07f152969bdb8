extern crate clap;
use acmi_tools::decoder::split_lines;
use acmi_tools::{decode_line, Error, Line};
use clap::{App, Arg};
use std::io::{stdout, Write};

/**
 * Dumps every decoded ACMI line as `<line> <kind> <id> <key> <value>` rows,
 * one row per key=value pair, for checking what the summary will see.
 */
fn main() -> Result<(), Error> {
    let input_args = App::new("acmi-seq")
        .version(&acmi_tools::version()[..])
        .author("Joshua Vander Hook <josh@vanderhook.info>")
        .about(&acmi_tools::about()[..])
        .arg(
            Arg::with_name("input")
                .required(false)
                .help("ACMI text log to read. Reads stdin when absent or '-'"),
        )
        .arg(
            Arg::with_name("events_only")
                .short("e")
                .help("Only print event lines (those with a T field)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("More logging on stderr; repeat for more."),
        )
        .get_matches();

    acmi_tools::init_logging(input_args.occurrences_of("verbose"));
    let events_only = input_args.is_present("events_only");

    let text = acmi_tools::read_input(input_args.value_of("input"))?;
    let out = stdout();
    let mut out = out.lock();

    //we're humans here, lines start at 1
    let mut skipped = 0;
    for (idx, raw) in split_lines(&text).enumerate() {
        let line_count = idx + 1;
        let line = decode_line(raw);
        let is_event = line.is_event();
        match line {
            Line::Ignore => skipped += 1,
            Line::Metadata { key, value } => {
                if !events_only {
                    writeln!(out, "{} meta - {} {}", line_count, key, value).unwrap_or(());
                }
            }
            Line::Object { id, fields } => {
                if events_only && !is_event {
                    continue;
                }
                let kind = if is_event { "event" } else { "object" };
                let mut keys: Vec<&String> = fields.keys().collect();
                keys.sort();
                if keys.is_empty() {
                    writeln!(out, "{} {} {} - -", line_count, kind, id).unwrap_or(());
                }
                for key in keys {
                    writeln!(out, "{} {} {} {} {}", line_count, kind, id, key, fields[key]).unwrap_or(());
                }
            }
        }
    }
    eprintln!("Skipped {} blank or comment lines", skipped);
    Ok(())
}
