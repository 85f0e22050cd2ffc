use std::env;
use std::process::ExitCode;

use timetable_tool::{
    PersonalizedTimetable, assemble_timetable, load_catalog_from_csv, load_slot_grid_from_csv,
    prepare_course_table, save_timetable_to_csv, save_timetable_to_json,
};

fn print_help() {
    println!(
        "Usage:\n  cli courses <course_table.csv>\n                                     List selectable courses\n  cli build <course_table.csv> <slot_grid.csv> CODE... [--csv <path>] [--json <path>]\n                                     Build a personalized timetable for the codes\n  cli prepare <raw_table.csv> <out.csv>\n                                     Normalize a raw registrar export\n  cli help                           Show this help"
    );
}

fn render_timetable_as_text_table(timetable: &PersonalizedTimetable) -> String {
    let mut col_names = vec!["Time Slot".to_string()];
    col_names.extend(timetable.days().iter().cloned());

    // Compute column widths
    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (row, label) in timetable.time_labels().iter().enumerate() {
        if label.len() > widths[0] {
            widths[0] = label.len();
        }
        for day_idx in 0..timetable.days().len() {
            let text = timetable
                .cell(row, day_idx)
                .and_then(|cell| cell.compact_label())
                .unwrap_or_default();
            if text.len() > widths[day_idx + 1] {
                widths[day_idx + 1] = text.len();
            }
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    // Header
    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    // Rows
    for (row, label) in timetable.time_labels().iter().enumerate() {
        out.push('|');
        let mut row_texts = vec![label.clone()];
        for day_idx in 0..timetable.days().len() {
            row_texts.push(
                timetable
                    .cell(row, day_idx)
                    .and_then(|cell| cell.compact_label())
                    .unwrap_or_default(),
            );
        }
        for (ci, text) in row_texts.iter().enumerate() {
            out.push(' ');
            out.push_str(text);
            let pad = widths[ci].saturating_sub(text.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn run_courses(args: &[String]) -> Result<(), String> {
    let [table_path] = args else {
        return Err("usage: cli courses <course_table.csv>".into());
    };
    let catalog = load_catalog_from_csv(table_path).map_err(|err| err.to_string())?;
    let courses = catalog.selectable_courses().map_err(|err| err.to_string())?;
    for course in &courses {
        println!("{:<12} {:<50} {}", course.code, course.name, course.credit);
    }
    println!("{} selectable courses.", courses.len());
    Ok(())
}

fn run_build(args: &[String]) -> Result<(), String> {
    if args.len() < 2 {
        return Err(
            "usage: cli build <course_table.csv> <slot_grid.csv> CODE... [--csv <path>] [--json <path>]"
                .into(),
        );
    }
    let table_path = &args[0];
    let grid_path = &args[1];

    let mut codes = Vec::new();
    let mut csv_out: Option<String> = None;
    let mut json_out: Option<String> = None;
    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--csv" => {
                csv_out = Some(
                    rest.next()
                        .ok_or_else(|| "--csv requires a path".to_string())?
                        .clone(),
                );
            }
            "--json" => {
                json_out = Some(
                    rest.next()
                        .ok_or_else(|| "--json requires a path".to_string())?
                        .clone(),
                );
            }
            code => codes.push(code.to_string()),
        }
    }
    if codes.is_empty() {
        return Err("no courses selected".into());
    }

    let catalog = load_catalog_from_csv(table_path).map_err(|err| err.to_string())?;
    let slot_grid = load_slot_grid_from_csv(grid_path).map_err(|err| err.to_string())?;
    let timetable =
        assemble_timetable(&catalog, &slot_grid, &codes).map_err(|err| err.to_string())?;

    print!("{}", render_timetable_as_text_table(&timetable));

    let clashes = timetable.clashes();
    if clashes.is_empty() {
        println!("No clashes.");
    } else {
        println!("Clashes found:");
        for clash in &clashes {
            println!(
                "  {} {}: {}",
                clash.day,
                clash.time_label,
                clash.codes.join(" / ")
            );
        }
    }

    if let Some(path) = csv_out {
        save_timetable_to_csv(&timetable, &path).map_err(|err| err.to_string())?;
        println!("Timetable saved to {path}.");
    }
    if let Some(path) = json_out {
        save_timetable_to_json(&timetable, &path).map_err(|err| err.to_string())?;
        println!("Timetable saved to {path}.");
    }
    Ok(())
}

fn run_prepare(args: &[String]) -> Result<(), String> {
    let [input, output] = args else {
        return Err("usage: cli prepare <raw_table.csv> <out.csv>".into());
    };
    prepare_course_table(input, output).map_err(|err| err.to_string())?;
    println!("Processed table saved to {output}.");
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        print_help();
        return ExitCode::FAILURE;
    };

    let result = match command.as_str() {
        "courses" => run_courses(rest),
        "build" => run_build(rest),
        "prepare" => run_prepare(rest),
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        other => Err(format!("unknown command '{other}'")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}
