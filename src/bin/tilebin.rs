use std::{
  fmt,
  path::{Path, PathBuf},
  process,
};

use clap::{Arg, ArgMatches, Command};
use log::{info, warn};
use tilebin::{
  decode_with, encode, infer_geometry,
  netpbm::{netpbm_read_sheet, netpbm_write_preview_gray, netpbm_write_preview_rgb, netpbm_write_sheet},
  TileError, TileFormat,
};

/// Everything that can stop a command.
enum Failure {
  Tile(TileError, Option<TileFormat>),
  Io(std::io::Error, PathBuf),
}
impl fmt::Display for Failure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Tile(e, Some(format)) => write!(f, "{e} (format {})", format.slug()),
      Self::Tile(e, None) => write!(f, "{e}"),
      Self::Io(e, path) => write!(f, "{}: {e}", path.display()),
    }
  }
}

fn with_format(format: TileFormat) -> impl Fn(TileError) -> Failure {
  move |e| Failure::Tile(e, Some(format))
}

fn read(path: &Path) -> Result<Vec<u8>, Failure> {
  std::fs::read(path).map_err(|e| Failure::Io(e, path.to_path_buf()))
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), Failure> {
  std::fs::write(path, bytes).map_err(|e| Failure::Io(e, path.to_path_buf()))?;
  info!("wrote {} bytes to {}", bytes.len(), path.display());
  Ok(())
}

fn format_arg() -> Arg<'static> {
  Arg::new("FORMAT")
    .short('f')
    .long("format")
    .takes_value(true)
    .help("tile format: a tag number, slug, or name (see `tilebin formats`)")
}

fn main() {
  let matches = Command::new("tilebin")
    .version(env!("CARGO_PKG_VERSION"))
    .about("Converts raw console tile graphics to and from Netpbm images")
    .subcommand_required(true)
    .arg_required_else_help(true)
    .arg(
      Arg::new("VERBOSE")
        .short('v')
        .long("verbose")
        .multiple_occurrences(true)
        .global(true)
        .help("more log output (-v info, -vv debug, -vvv trace)"),
    )
    .subcommand(Command::new("formats").about("lists the supported tile formats"))
    .subcommand(
      Command::new("info")
        .about("shows how a raw file would be laid out as a sheet")
        .arg(Arg::new("BIN").help("raw tile file").required(true).index(1))
        .arg(format_arg())
        .arg(row_width_arg()),
    )
    .subcommand(
      Command::new("decode")
        .about("converts a raw tile file into a PGM/PAM sheet")
        .arg(Arg::new("BIN").help("raw tile file").required(true).index(1))
        .arg(format_arg())
        .arg(
          Arg::new("OUTPUT")
            .short('o')
            .long("out")
            .takes_value(true)
            .required(true)
            .help("sheet to write (.pgm or .pam)"),
        )
        .arg(row_width_arg())
        .arg(
          Arg::new("PREVIEW")
            .long("preview")
            .takes_value(true)
            .help("also write a viewable preview image"),
        )
        .arg(
          Arg::new("GRAY")
            .long("gray")
            .requires("PREVIEW")
            .help("make the preview grayscale instead of using the palette"),
        ),
    )
    .subcommand(
      Command::new("encode")
        .about("converts a PGM/PAM sheet back into a raw tile file")
        .arg(Arg::new("SHEET").help("sheet written by `tilebin decode`").required(true).index(1))
        .arg(format_arg())
        .arg(
          Arg::new("OUTPUT")
            .short('o')
            .long("out")
            .takes_value(true)
            .required(true)
            .help("raw tile file to write"),
        ),
    )
    .get_matches();

  let level = match matches.occurrences_of("VERBOSE") {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

  let result = match matches.subcommand() {
    Some(("formats", _)) => {
      list_formats();
      Ok(())
    }
    Some(("info", m)) => show_info(m),
    Some(("decode", m)) => decode_file(m),
    Some(("encode", m)) => encode_file(m),
    _ => unreachable!("clap requires a subcommand"),
  };
  if let Err(e) = result {
    eprintln!("error: {e}");
    process::exit(1);
  }
}

fn row_width_arg() -> Arg<'static> {
  Arg::new("ROW_WIDTH")
    .long("row-width")
    .takes_value(true)
    .help("wrap the sheet at this many pixels instead of the format's default")
}

fn parse_format(m: &ArgMatches) -> Result<Option<TileFormat>, Failure> {
  m.value_of("FORMAT")
    .map(|s| s.parse::<TileFormat>().map_err(|e| Failure::Tile(e, None)))
    .transpose()
}

/// Picks a format from a `.chr`, `.nes` or `.gb` file name.
fn format_from_path(path: &Path) -> Option<TileFormat> {
  path.extension().and_then(|ext| ext.to_str()).and_then(TileFormat::from_extension)
}

/// The `-f` flag, else the file's extension, else the default format.
fn resolve_format(m: &ArgMatches, path: &Path) -> Result<TileFormat, Failure> {
  if let Some(format) = parse_format(m)? {
    return Ok(format);
  }
  if let Some(format) = format_from_path(path) {
    info!("{}: using {} from the file extension", path.display(), format.slug());
    return Ok(format);
  }
  let format = TileFormat::default();
  warn!("{}: no format given, assuming {} (use -f to pick one)", path.display(), format.slug());
  Ok(format)
}

fn descriptor_for(
  m: &ArgMatches, format: TileFormat,
) -> Result<tilebin::FormatDescriptor, Failure> {
  let descriptor = *format.descriptor();
  match m.value_of("ROW_WIDTH") {
    None => Ok(descriptor),
    Some(s) => {
      let width = s.parse::<u32>().map_err(|_| Failure::Tile(TileError::InvalidRowWidth, Some(format)))?;
      descriptor.with_default_width(width).map_err(with_format(format))
    }
  }
}

fn list_formats() {
  println!("{:>3}  {:<14} {:<16} {:>4} {:>10} {:>6}", "tag", "slug", "name", "bpp", "tile bytes", "width");
  for format in TileFormat::ALL {
    let d = format.descriptor();
    println!(
      "{:>3}  {:<14} {:<16} {:>4} {:>10} {:>6}",
      format.tag(),
      d.slug,
      d.name,
      d.bits_per_pixel,
      d.tile_byte_size(),
      d.default_width
    );
  }
}

fn show_info(m: &ArgMatches) -> Result<(), Failure> {
  let path = Path::new(m.value_of("BIN").unwrap_or_default());
  let format = resolve_format(m, path)?;
  let descriptor = descriptor_for(m, format)?;
  let len = std::fs::metadata(path).map_err(|e| Failure::Io(e, path.to_path_buf()))?.len();
  let g = infer_geometry(len, &descriptor).map_err(with_format(format))?;
  println!("format:   {} ({})", descriptor.name, descriptor.slug);
  println!("bytes:    {len}");
  println!("sheet:    {}x{}", g.width, g.height);
  println!("tiles:    {} ({} bytes each)", g.tile_count, descriptor.tile_byte_size());
  println!("padding:  {} tiles", g.padding_count());
  println!("surplus:  {} bytes", g.surplus);
  Ok(())
}

fn decode_file(m: &ArgMatches) -> Result<(), Failure> {
  let input = Path::new(m.value_of("BIN").unwrap_or_default());
  let format = resolve_format(m, input)?;
  let descriptor = descriptor_for(m, format)?;
  let output = Path::new(m.value_of("OUTPUT").unwrap_or_default());

  let blob = read(input)?;
  let sheet = decode_with(&blob, &descriptor).map_err(with_format(format))?;
  if let Some(surplus) = &sheet.surplus {
    warn!("{}: {} trailing bytes don't fill a tile, keeping them as metadata", input.display(), surplus.len());
  }
  write(output, &netpbm_write_sheet(&sheet, format).map_err(with_format(format))?)?;

  if let Some(preview) = m.value_of("PREVIEW") {
    let bytes = if m.is_present("GRAY") {
      netpbm_write_preview_gray(&sheet.pixels, &descriptor)
    } else {
      netpbm_write_preview_rgb(&sheet.pixels, &sheet.palette)
    }
    .map_err(with_format(format))?;
    write(Path::new(preview), &bytes)?;
  }
  Ok(())
}

fn encode_file(m: &ArgMatches) -> Result<(), Failure> {
  let input = Path::new(m.value_of("SHEET").unwrap_or_default());
  let output = Path::new(m.value_of("OUTPUT").unwrap_or_default());
  let bytes = read(input)?;
  let sheet = netpbm_read_sheet(&bytes).map_err(|e| Failure::Tile(e, None))?;
  let format = match (parse_format(m)?, sheet.format) {
    (Some(flag), Some(recorded)) if flag != recorded => {
      warn!("{} was decoded as {}, encoding as {} anyway", input.display(), recorded.slug(), flag.slug());
      flag
    }
    (Some(format), _) | (None, Some(format)) => format,
    (None, None) => resolve_format(m, output)?,
  };
  let blob = encode(&sheet.pixels, sheet.surplus.as_deref(), format).map_err(with_format(format))?;
  write(output, &blob)
}
