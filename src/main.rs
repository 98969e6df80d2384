use anyhow::{Context, Result, bail};
use clap::Parser;
use fifteen_solver::{
    board::{Board, format_moves},
    solver::{SolveResult, solve},
};

use std::{
    fs::OpenOptions,
    io::{IsTerminal, Read, Write, stderr, stdin},
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Preview the parsed board without solving
    #[arg(short, long)]
    preview: bool,
    /// Append a one-record summary of the run to this file
    #[arg(short, long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Path to a board file: 16 whitespace-separated values, 0 is the blank
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let Cli {
        preview,
        report,
        file,
    } = Cli::parse();

    let content = if let Some(file) = &file {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    } else if !stdin().is_terminal() {
        let mut content = String::new();
        stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        content
    } else {
        bail!("No board `file` provided and stdin is a terminal.");
    };
    let board = Board::parse(&content).context("Failed to parse board")?;

    if preview {
        println!("{}", board.to_pretty_string());
        return Ok(());
    }

    let result = do_solve(board)?;

    if let Some(path) = report {
        append_report(&path, file.as_deref(), &result)
            .with_context(|| format!("Failed to append report to {}", path.display()))?;
    }

    Ok(())
}

fn do_solve(board: Board) -> Result<SolveResult> {
    println!("{}\n", board.to_pretty_string());

    let result = with_spinner("Solving the puzzle...", move || solve(board))?;

    let thresholds = result
        .thresholds
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    println!("Initial estimate = {}", result.thresholds[0]);
    println!("Thresholds = {thresholds}");
    println!(
        "✓ Solved in {} moves — Generated: {}, Expanded: {}, Time: {}, Expanded/s: {}",
        result.length(),
        format_count(result.generated),
        format_count(result.expanded),
        format_elapsed(result.elapsed),
        format_count(expanded_per_second(&result)),
    );
    if !result.moves.is_empty() {
        println!("\n{}", format_moves(&result.moves));
    }

    Ok(result)
}

fn append_report(path: &Path, source: Option<&Path>, result: &SolveResult) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let source = source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".into());
    writeln!(
        file,
        "{source}\n\tSolution = {}, Generated = {}, Expanded = {}, Time = {:.6}, Expanded/Second = {}\n",
        result.length(),
        result.generated,
        result.expanded,
        result.elapsed.as_secs_f64(),
        expanded_per_second(result),
    )?;
    Ok(())
}

fn expanded_per_second(result: &SolveResult) -> u64 {
    // Trivial boards solve in effectively zero time; clamp the divisor.
    let secs = result.elapsed.max(Duration::from_micros(1)).as_secs_f64();
    (result.expanded as f64 / secs) as u64
}

fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut output = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            output.push(',');
        }
        output.push(c);
    }
    output
}

fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    if !stderr().is_terminal() {
        return f();
    }

    let running = Arc::new(AtomicBool::new(true));
    let ticker = {
        let running = Arc::clone(&running);
        let message = message.to_string();
        std::thread::spawn(move || {
            const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
            let mut out = stderr().lock();
            let _ = write!(out, "\x1b[?25l"); // hide cursor
            for frame in FRAMES.iter().cycle() {
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                let _ = write!(out, "\r{frame} {message}");
                let _ = out.flush();
                std::thread::sleep(Duration::from_millis(100));
            }
            let _ = write!(out, "\r\x1b[2K\x1b[?25h"); // clear line, show cursor
            let _ = out.flush();
        })
    };

    let result = f();
    running.store(false, Ordering::Relaxed);
    let _ = ticker.join();
    result
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 90 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{:.3}s", elapsed.as_secs_f64())
    }
}
