// SPDX-License-Identifier: MIT
//
// vista: paint a handful of attributed log lines and print them as ANSI.
//
// This is the binary that wires the three crates together:
//
//   vista-theme → palette matching, role registry, color pairs
//   vista-view  → attributed lines, word wrap, line painting
//   vista-term  → frame buffer and SGR output
//
// Each line flows through:
//
//   AttrLine → paint_line (expand, composite, flatten) → FrameBuffer
//   FrameBuffer → sgr::write_frame (pair → colors via registry) → stdout
//
// Switches: --dim, --default-colors, --colors N, --pairs N, --width N.
// RUST_LOG=debug shows the role table being built; trace shows every
// dynamically allocated pair.

use std::env;
use std::io::{self, Write};
use std::process;

use tracing_subscriber::EnvFilter;

use vista_term::buffer::FrameBuffer;
use vista_term::cell::{Attr, TextAttr};
use vista_term::color::{CellColor, ansi};
use vista_term::sgr;
use vista_theme::{ColorSettings, Palette, Role, RoleRegistry, TermCaps};
use vista_view::{AttrLine, AttrValue, LineRange, TextWrap, paint_line};

const DEFAULT_WIDTH: u16 = 72;

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Options {
    caps: TermCaps,
    settings: ColorSettings,
    width: u16,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            caps: TermCaps::default(),
            settings: ColorSettings::default(),
            width: DEFAULT_WIDTH,
        }
    }
}

fn number(flag: &str, value: Option<String>) -> Result<u16, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .map_err(|_| format!("{flag}: not a number: {value}"))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut opts = Options::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dim" => opts.settings.dim_text = true,
            "--default-colors" => opts.settings.default_colors = true,
            "--colors" => opts.caps.colors = number(&arg, args.next())?,
            "--pairs" => opts.caps.color_pairs = number(&arg, args.next())?,
            "--width" => opts.width = number(&arg, args.next())?,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    if opts.width == 0 {
        return Err("--width must be at least 1".to_owned());
    }
    Ok(opts)
}

// ─── Sample lines ───────────────────────────────────────────────────────────

/// A log line: timestamp, level, source, message.
fn log_line(registry: &RoleRegistry<'_>, stamp: &str, level: &str, level_role: Role, rest: &str) -> AttrLine {
    let mut line = AttrLine::from(stamp);
    line.add_attr(LineRange::new(0, stamp.len()), AttrValue::Style(registry.attrs_for_role(Role::OffsetTime)));

    let level_start = line.len() + 1;
    line.append_str(" ").append_str(level);
    line.add_attr(
        LineRange::new(level_start, level_start + level.len()),
        AttrValue::Style(registry.attrs_for_role(level_role)),
    );

    line.append_str(" ").append_str(rest);
    line
}

/// Build the demo lines. Wrapped text is split so each piece gets a row.
fn sample_lines(registry: &RoleRegistry<'_>, width: u16) -> Result<Vec<AttrLine>, String> {
    let palette = registry.palette();
    let mut lines = Vec::new();

    let mut info = log_line(registry, "09:30:00.120", "INFO", Role::Ok, "server: listening on 0.0.0.0:8080");
    let src = info.text().find("server").unwrap_or(0);
    info.add_attr(LineRange::new(src, src + "server".len()), AttrValue::Foreground(ansi::CYAN));
    lines.push(info);

    let mut warn = log_line(registry, "09:30:01.004", "WARN", Role::Warning, "cache:\tmiss rate 42% for caf\u{e9}-menu");
    let hot = warn.text().find("42%").unwrap_or(0);
    warn.add_attr(LineRange::new(hot, hot + 3), AttrValue::Style(TextAttr::style(Attr::BOLD | Attr::UNDERLINE)));
    lines.push(warn);

    let mut error = log_line(registry, "09:30:02.517", "ERROR", Role::Error, "disk: /var is full, 0 bytes free");
    let path = error.text().find("/var").unwrap_or(0);
    let highlight = palette.parse_color("#5f87af").map_err(|e| e.to_string())?;
    error
        .add_attr(LineRange::new(path, path + 4), AttrValue::Background(palette.match_color(highlight)))
        .add_attr(LineRange::new(path, path + 4), AttrValue::Foreground(ansi::WHITE));
    lines.push(error);

    let mut rule = AttrLine::from(" ".repeat(usize::from(width)).as_str());
    rule.add_attr(LineRange::open(0), AttrValue::Graphic('─'));
    lines.push(rule);

    let wrap = TextWrap::new(usize::from(width), 4);
    let mut note = AttrLine::from("note: ");
    note.add_attr(LineRange::new(0, 4), AttrValue::Style(registry.attrs_for_role(Role::Keyword)));
    let body = AttrLine::from(
        "attributes stay attached to the words they covered when a long message is \
         wrapped, and continuation lines are indented under the first one",
    )
    .with_attr(LineRange::new(0, 10), AttrValue::Style(registry.attrs_for_role(Role::Variable)));
    note.insert(note.len(), &body, Some(&wrap));
    lines.extend(note.split_lines());

    let mut status = AttrLine::from(" vista  sample log  [default colors: ");
    status.append_str(if registry.settings().default_colors { "on]" } else { "off]" });
    let name_end = " vista".len();
    status.add_attr(LineRange::new(1, name_end), AttrValue::Style(registry.attrs_for_role(Role::ActiveStatus2)));
    lines.push(status);

    Ok(lines)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn run(opts: Options) -> Result<(), String> {
    let palette = Palette::xterm();
    let mut registry = RoleRegistry::new(&palette, opts.caps, opts.settings);

    let lines = sample_lines(&registry, opts.width)?;
    let height = u16::try_from(lines.len()).map_err(|_| "too many lines".to_owned())?;
    let mut frame = FrameBuffer::new(opts.width, height);
    let window = LineRange::new(0, usize::from(opts.width));
    let last = lines.len() - 1;
    tracing::debug!(rows = height, width = opts.width, tier = ?registry.tier(), "painting sample lines");

    for (row, line) in (0..height).zip(&lines) {
        let role = if usize::from(row) == last { Role::Status } else { Role::Text };
        paint_line(&mut frame, &mut registry, row, 0, line, window, role).map_err(|e| e.to_string())?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    sgr::write_frame(
        &frame,
        |pair| registry.pair_colors(pair).unwrap_or((CellColor::Default, CellColor::Default)),
        &mut out,
    )
    .and_then(|()| writeln!(out))
    .map_err(|e| format!("write failed: {e}"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opts = parse_args(env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("vista: {e}");
        process::exit(2);
    });

    if let Err(e) = run(opts) {
        eprintln!("vista: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
