use clap::{Arg, Command};
use csv_user_import::parse::display_header;
use csv_user_import::{
    reader_from_path, ImportSession, JsonlStore, MemoryStore, TargetField,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = Command::new("csv-user-import")
        .about("Import a ;-delimited CSV of people into a user store")
        .arg(
            Arg::new("path")
                .long("path")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true)
                .help("CSV file to import (.gz and .zst are decompressed)"),
        )
        .arg(
            Arg::new("first")
                .long("first")
                .default_value("Ignore")
                .help("Selection for First Name: an option label or a raw header name"),
        )
        .arg(
            Arg::new("last")
                .long("last")
                .default_value("Ignore")
                .help("Selection for Last Name"),
        )
        .arg(
            Arg::new("street")
                .long("street")
                .default_value("Ignore")
                .help("Selection for Street"),
        )
        .arg(
            Arg::new("post_code")
                .long("post-code")
                .default_value("Ignore")
                .help("Selection for Post Code"),
        )
        .arg(
            Arg::new("country")
                .long("country")
                .default_value("Ignore")
                .help("Selection for Country"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write saved users as JSON lines to this file (overwritten per run)"),
        )
        .arg(
            Arg::new("preview")
                .long("preview")
                .value_parser(clap::value_parser!(usize))
                .default_value("5")
                .help("Data rows to print before committing"),
        )
        .get_matches();

    let path = matches.get_one::<PathBuf>("path").unwrap();
    let reader = reader_from_path(path).await?;
    let mut session = match ImportSession::load(reader).await {
        Ok(session) => session,
        Err(err) => {
            // Upload failures are a message, not a crash; no data is loaded.
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let header_line: Vec<String> = session.headers().iter().map(|h| display_header(h)).collect();
    println!("{}", header_line.join(" | "));
    let preview = *matches.get_one::<usize>("preview").unwrap();
    for row in session.rows().iter().take(preview) {
        println!("{}", row.join(" | "));
    }
    if session.rows().len() > preview {
        println!("... {} more rows", session.rows().len() - preview);
    }

    for (field, arg) in [
        (TargetField::FirstName, "first"),
        (TargetField::LastName, "last"),
        (TargetField::Street, "street"),
        (TargetField::PostCode, "post_code"),
        (TargetField::Country, "country"),
    ] {
        session.select(field, matches.get_one::<String>(arg).unwrap().clone());
    }
    if !session.is_ready() {
        // Unreachable with clap defaults in place; kept as the save gate.
        eprintln!("mapping incomplete; nothing saved");
        std::process::exit(1);
    }

    let outcome = if let Some(out) = matches.get_one::<PathBuf>("out") {
        let mut store = JsonlStore::create(out).await?;
        let outcome = session.commit(&mut store).await;
        if outcome.is_ok() {
            store.sync().await?;
        }
        outcome
    } else {
        let mut store = MemoryStore::new();
        session.commit(&mut store).await
    };

    match outcome {
        Ok(outcome) => println!("Users saved ({})", outcome.saved),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}
