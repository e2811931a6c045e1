use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use unicode_width::UnicodeWidthStr;

use enamdict::source::{self, ENAMDICT_URL};
use enamdict::{EntrySet, NameDictionary, NameKind};

#[derive(Parser)]
#[command(name = "nametool", about = "ENAMDICT name dictionary tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the raw upstream dictionary archive
    Fetch {
        /// Source URL
        #[arg(long, default_value = ENAMDICT_URL)]
        url: String,
        /// Output file
        output_file: String,
    },
    /// Convert a raw upstream file to the sorted record format
    Convert {
        /// Raw EUC-JP dictionary file (.gz or plain)
        input_file: String,
        /// Output record file (gzip-compressed when it ends in .gz)
        output_file: String,
    },
    /// Compile a record file into a binary snapshot
    Compile {
        /// Record file (.gz or plain)
        input_file: String,
        /// Output snapshot file
        output_file: String,
    },
    /// Show dictionary statistics
    Info {
        /// Record or snapshot file
        file: String,
    },
    /// Resolve a single romanized name
    Lookup {
        /// Record or snapshot file
        dict_file: String,
        /// Romanized name to resolve
        romaji: String,
        /// Treat the query as a kanji prefix instead
        #[arg(long)]
        kanji: bool,
    },
    /// Resolve a full (surname + given) name
    Name {
        /// Record or snapshot file
        dict_file: String,
        /// Full romanized name, e.g. "Hiroshige Utagawa"
        full_name: String,
    },
}

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

fn main() {
    enamdict::trace_init::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch { url, output_file } => {
            eprintln!("Downloading {url}...");
            die!(
                source::fetch(&url, Path::new(&output_file)),
                "Error fetching dictionary: {}"
            );
            eprintln!("Wrote {output_file}");
        }
        Command::Convert {
            input_file,
            output_file,
        } => {
            let stats = die!(
                source::convert(Path::new(&input_file), Path::new(&output_file)),
                "Error converting dictionary: {}"
            );
            eprintln!(
                "Wrote {output_file} ({} records, skipped {} of {} lines)",
                stats.records, stats.skipped, stats.total_lines
            );
        }
        Command::Compile {
            input_file,
            output_file,
        } => {
            let dict = die!(
                NameDictionary::open(Path::new(&input_file)),
                "Error loading dictionary: {}"
            );
            die!(
                dict.save_snapshot(Path::new(&output_file)),
                "Error writing snapshot: {}"
            );
            eprintln!("Wrote {output_file} ({} records)", dict.len());
        }
        Command::Info { file } => {
            let dict = die!(
                NameDictionary::open(Path::new(&file)),
                "Error loading dictionary: {}"
            );
            let mut surnames = 0usize;
            let mut given = 0usize;
            let mut unknown = 0usize;
            for rec in dict.records() {
                match rec.kind {
                    NameKind::Surname => surnames += 1,
                    NameKind::Given => given += 1,
                    NameKind::Unknown => unknown += 1,
                }
            }
            println!("Records:  {}", dict.len());
            println!("Surnames: {surnames}");
            println!("Given:    {given}");
            println!("Unknown:  {unknown}");
        }
        Command::Lookup {
            dict_file,
            romaji,
            kanji,
        } => {
            let dict = die!(
                NameDictionary::open(Path::new(&dict_file)),
                "Error loading dictionary: {}"
            );
            let result = if kanji {
                dict.find_kanji(&romaji)
            } else {
                dict.find(&romaji)
            };
            match result {
                Some(set) => print_entry_set(&set),
                None => {
                    eprintln!("No match for {romaji:?}");
                    process::exit(1);
                }
            }
        }
        Command::Name {
            dict_file,
            full_name,
        } => {
            let dict = die!(
                NameDictionary::open(Path::new(&dict_file)),
                "Error loading dictionary: {}"
            );
            let Some(name) = dict.find_by_name(&full_name) else {
                eprintln!("Not a one- or two-part name: {full_name:?}");
                process::exit(1);
            };
            println!("Name:   {}", name.romaji());
            println!("Modern: {}", name.romaji_modern());
            if !name.kana().is_empty() {
                println!("Kana:   {}", name.kana());
            }
            for candidate in name.kanji() {
                println!("Kanji:  {candidate}");
            }
        }
    }
}

fn print_entry_set(set: &EntrySet) {
    println!(
        "Matched {:?} ({} records, {})",
        set.matched_key(),
        set.records().len(),
        kind_label(set.kind())
    );
    if !set.romaji().is_empty() {
        println!("Romaji: {}", set.romaji());
    }
    if !set.kana().is_empty() {
        println!("Kana:   {}", set.kana());
    }

    // Kanji renders double-width; pad by display width so the columns line up.
    let width = set
        .records()
        .iter()
        .map(|r| r.kanji.width())
        .max()
        .unwrap_or(0);
    for rec in set.records() {
        let pad = " ".repeat(width.saturating_sub(rec.kanji.width()));
        println!(
            "  {}{}  {}  {} ({})",
            rec.kanji,
            pad,
            rec.kana,
            rec.romaji,
            kind_label(rec.kind)
        );
    }
}

fn kind_label(kind: NameKind) -> &'static str {
    match kind {
        NameKind::Surname => "surname",
        NameKind::Given => "given",
        NameKind::Unknown => "unknown",
    }
}
