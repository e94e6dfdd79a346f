// Iris Explorer - Main executable
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::sync::Arc;

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use log::info;

use iris_explorer::{
    api::{Server, ServerConfig},
    data::{CsvExport, DataSource, FileSource, HttpSource, Table, EXPORT_FILE_NAME},
    processing::{apply, summarize, FilterSelection, FilterSpec, DESCRIBE_LABELS},
    storage::DatasetLoader,
    utils::{init_logging, AppResult, Config},
};

fn filter_args() -> [Arg<'static>; 5] {
    [
        Arg::new("species")
            .long("species")
            .value_name("NAME")
            .help("Species to keep, or \"All\"")
            .takes_value(true),
        Arg::new("x-axis")
            .long("x-axis")
            .value_name("ATTRIBUTE")
            .help("Attribute the range applies to")
            .takes_value(true),
        Arg::new("y-axis")
            .long("y-axis")
            .value_name("ATTRIBUTE")
            .help("Attribute the mean is reported for")
            .takes_value(true),
        Arg::new("x-min")
            .long("x-min")
            .value_name("VALUE")
            .help("Lower bound of the X range")
            .takes_value(true)
            .allow_hyphen_values(true),
        Arg::new("x-max")
            .long("x-max")
            .value_name("VALUE")
            .help("Upper bound of the X range")
            .takes_value(true)
            .allow_hyphen_values(true),
    ]
}

fn cli() -> Command<'static> {
    Command::new("Iris Explorer")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Interactive exploration of the Iris dataset")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Reads the dataset from a local CSV instead of the configured URL")
                .takes_value(true),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Overrides the configured log level")
                .takes_value(true),
        )
        .subcommand(
            Command::new("server")
                .about("Run the API server")
                .arg(
                    Arg::new("host")
                        .short('H')
                        .long("host")
                        .value_name("HOST")
                        .help("Sets the server host")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Sets the server port")
                        .takes_value(true),
                ),
        )
        .subcommand(
            Command::new("summary")
                .about("Print summary metrics for a filter")
                .args(filter_args()),
        )
        .subcommand(
            Command::new("export")
                .about("Write the filtered rows as CSV")
                .args(filter_args())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Output path")
                        .default_value(EXPORT_FILE_NAME)
                        .takes_value(true),
                ),
        )
}

fn parse_f64(matches: &ArgMatches, name: &str) -> anyhow::Result<Option<f64>> {
    matches
        .value_of(name)
        .map(|v| v.parse::<f64>().with_context(|| format!("--{} must be a number, got '{}'", name, v)))
        .transpose()
}

fn filter_spec(matches: &ArgMatches, table: &Table) -> anyhow::Result<FilterSpec> {
    let selection = FilterSelection {
        species: matches.value_of("species").map(str::to_string),
        x_axis: matches.value_of("x-axis").map(str::to_string),
        y_axis: matches.value_of("y-axis").map(str::to_string),
        x_min: parse_f64(matches, "x-min")?,
        x_max: parse_f64(matches, "x-max")?,
    };

    Ok(selection.resolve(table)?)
}

fn print_summary(spec: &FilterSpec, table: &Table) {
    let filtered = apply(table, spec);
    let stats = summarize(&filtered, spec.y_axis);

    println!(
        "Filter: species={} {} in [{}, {}]",
        spec.category, spec.x_axis, spec.range.0, spec.range.1
    );
    println!("Rows (filtered): {}", stats.row_count);
    println!("Species count:   {}", stats.category_count);
    println!("Mean {}: {:.2}", stats.y_axis, stats.mean_y);
    println!();

    print!("{:<14}", "");
    for label in DESCRIBE_LABELS {
        print!("{:>9}", label);
    }
    println!();

    for row in &stats.describe {
        print!("{:<14}", row.attribute.name());
        for value in row.formatted() {
            print!("{:>9}", value);
        }
        println!();
    }
}

fn write_export(spec: &FilterSpec, table: &Table, output: &str) -> AppResult<usize> {
    let filtered = apply(table, spec);
    let export = CsvExport::from_table(&filtered)?;
    fs::write(output, &export.bytes)?;

    Ok(filtered.len())
}

fn build_source(matches: &ArgMatches, config: &Config) -> AppResult<Box<dyn DataSource>> {
    let source: Box<dyn DataSource> = match matches.value_of("input") {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(HttpSource::new(&config.dataset.url, config.dataset_timeout())?),
    };

    Ok(source)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    // Load configuration
    let mut config = match matches.value_of("config") {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config file {}", path))?,
        None => Config::default(),
    };

    if let Some(level) = matches.value_of("log-level") {
        config.logging.level = level.to_string();
    }

    if let Err(err) = init_logging(config.log_level_filter()) {
        eprintln!("Error initializing logger: {}", err);
    }

    let loader = Arc::new(DatasetLoader::from_boxed(build_source(&matches, &config)?));

    match matches.subcommand() {
        Some(("server", sub)) => {
            if let Some(host) = sub.value_of("host") {
                config.server.host = host.to_string();
            }
            if let Some(port) = sub.value_of("port") {
                config.server.port = port
                    .parse()
                    .with_context(|| format!("--port must be a port number, got '{}'", port))?;
            }
            config.validate()?;

            let server = Server::new(loader, ServerConfig::from_config(&config));
            server.run().await?;
        }
        Some(("summary", sub)) => {
            let table = loader.load().await?;
            let spec = filter_spec(sub, &table)?;
            print_summary(&spec, &table);
        }
        Some(("export", sub)) => {
            let table = loader.load().await?;
            let spec = filter_spec(sub, &table)?;
            let output = sub.value_of("output").unwrap_or(EXPORT_FILE_NAME);
            let rows = write_export(&spec, &table, output)?;
            info!("Wrote {} rows to {}", rows, output);
        }
        _ => println!("No subcommand specified. Use --help for usage information."),
    }

    Ok(())
}
