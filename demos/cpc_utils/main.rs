//! CPC Graphics CLI Utility
//!
//! A command-line tool converting quantized images to Amstrad CPC data and back.
//!
//! # Features
//!
//! - **encode**: Convert an image to a screen or sprite binary, with optional assembly and
//!   JSON exports
//! - **decode**: Convert a screen or sprite binary back to PNG using an OCP palette
//! - **delta**: Build a looping delta animation from a sequence of frames
//! - **tiles**: Deduplicate the tiles of an image and export the tile map
//! - **sprites**: Split a sprite board into packed sprites or CPC+ hardware sprites
//! - **palette**: Show the firmware and hardware values of an image palette
//!
//! Images must already be quantized to the colors of the target mode.
//!
//! # Usage
//!
//! ```bash
//! # Encode a mode 1 screen with an AMSDOS header and an OCP palette
//! cargo run --example cpc_utils -- encode logo.png LOGO.SCR --mode 1 --amsdos --ocp LOGO.PAL
//!
//! # Decode it back
//! cargo run --example cpc_utils -- decode LOGO.SCR logo_back.png --ocp LOGO.PAL
//!
//! # Delta animation drawn at #C0A0
//! cargo run --example cpc_utils -- delta frame*.png --output anim.asm --start '#C0A0'
//!
//! # Tile map with 16x16 tiles
//! cargo run --example cpc_utils -- tiles level.png out/ --tile-size 16x16
//!
//! # Eight hardware sprites from a 4x2 board
//! cargo run --example cpc_utils -- sprites board.png out/ --columns 4 --rows 2 --hard
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cpcpix_rs::prelude::*;
use cpcpix_rs::cpcpix_types::gfx::{
	export::{amsdos, delta_animation_source},
	palette::firmware,
	tile::constants::MAX_TILES,
};
use image::RgbaImage;

#[derive(Parser)]
#[command(name = "cpc_utils")]
#[command(author = "cpcpix-rs project")]
#[command(version = "1.0")]
#[command(about = "Amstrad CPC graphics utility - screens, sprites, delta animations and tile maps", long_about = None)]
struct Cli {
	/// JSON configuration file, command line flags take precedence
	#[arg(short, long, global = true, value_name = "CONFIG_JSON")]
	config: Option<PathBuf>,

	/// Screen mode (0, 1 or 2)
	#[arg(short, long, global = true, value_parser = parse_mode)]
	mode: Option<Mode>,

	/// Pack as a sprite (raster order) instead of a screen
	#[arg(long, global = true)]
	sprite: bool,

	/// Use the dual bank overscan screen
	#[arg(long, global = true)]
	overscan: bool,

	/// Bytes per character row
	#[arg(long, global = true, value_parser = parse_address)]
	line_width: Option<u16>,

	/// Ink renumbering of packed data, e.g. 0=3,1=0
	#[arg(long, global = true, value_parser = parse_ink_swap)]
	ink_swap: Option<InkSwap>,

	/// Pixel mask combined with every packed byte (#AA, #55 in mode 0; #88, #44, #22, #11 in mode 1)
	#[arg(long, global = true, value_parser = parse_mask)]
	mask: Option<u8>,

	/// Combine the mask with OR instead of AND
	#[arg(long, global = true, requires = "mask")]
	mask_or: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Convert an image to CPC data
	Encode {
		/// Input image path
		#[arg(value_name = "INPUT_IMAGE")]
		input: PathBuf,

		/// Output binary path
		#[arg(value_name = "OUTPUT_BIN")]
		output: PathBuf,

		/// Prepend an AMSDOS header
		#[arg(long)]
		amsdos: bool,

		/// Also write the data as assembly source
		#[arg(long, value_name = "OUTPUT_ASM")]
		asm: Option<PathBuf>,

		/// Also write the data as JSON
		#[arg(long, value_name = "OUTPUT_JSON")]
		json: Option<PathBuf>,

		/// Also write an OCP palette file
		#[arg(long, value_name = "OUTPUT_PAL")]
		ocp: Option<PathBuf>,

		/// Compression applied to the binary
		#[arg(long)]
		compression: Option<String>,
	},

	/// Convert CPC data back to an image
	Decode {
		/// Input binary path (AMSDOS header optional)
		#[arg(value_name = "INPUT_BIN")]
		input: PathBuf,

		/// Output PNG path
		#[arg(value_name = "OUTPUT_PNG")]
		output: PathBuf,

		/// OCP palette file, also provides the mode
		#[arg(long, value_name = "INPUT_PAL")]
		ocp: PathBuf,

		/// Image width in pixels (defaults to the full screen line)
		#[arg(long)]
		width: Option<u32>,

		/// Image height in pixels
		#[arg(long, default_value_t = 200)]
		height: u32,
	},

	/// Build a looping delta animation
	Delta {
		/// Frame images, in playback order
		#[arg(value_name = "FRAMES", required = true, num_args = 2..)]
		frames: Vec<PathBuf>,

		/// Output assembly source
		#[arg(short, long, value_name = "OUTPUT_ASM")]
		output: PathBuf,

		/// Hardware address of the top-left byte (#C000, 0xC000, &C000 or decimal)
		#[arg(long, value_parser = parse_address)]
		start: Option<u16>,

		/// Keep at most this many frames, 0 keeps all
		#[arg(long)]
		max_frames: Option<usize>,
	},

	/// Deduplicate tiles and export a tile map
	Tiles {
		/// Input image path
		#[arg(value_name = "INPUT_IMAGE")]
		input: PathBuf,

		/// Output directory
		#[arg(value_name = "OUTPUT_DIR")]
		output: PathBuf,

		/// Tile size as WIDTHxHEIGHT, scanned automatically when absent
		#[arg(long, value_parser = parse_size)]
		tile_size: Option<Size>,

		/// Merge tiles closer than this mean color distance
		#[arg(long)]
		threshold: Option<f64>,
	},

	/// Split a sprite board into sprites
	Sprites {
		/// Input board image path
		#[arg(value_name = "INPUT_IMAGE")]
		input: PathBuf,

		/// Output directory
		#[arg(value_name = "OUTPUT_DIR")]
		output: PathBuf,

		/// Sprites per row of the board
		#[arg(long, default_value_t = 1)]
		columns: u32,

		/// Sprites per column of the board
		#[arg(long, default_value_t = 1)]
		rows: u32,

		/// Produce CPC+ hardware sprites (16x16, one byte per pixel)
		#[arg(long)]
		hard: bool,
	},

	/// Show the palette of an image
	Palette {
		/// Input image path
		#[arg(value_name = "INPUT_IMAGE")]
		input: PathBuf,
	},
}

fn parse_mode(s: &str) -> Result<Mode, String> {
	let value: u8 = s.parse().map_err(|_| format!("invalid mode '{s}'"))?;
	Mode::try_from(value).map_err(|e| e.to_string())
}

fn parse_address(s: &str) -> Result<u16, String> {
	let s = s.trim();
	let hex = s.strip_prefix('#').or_else(|| s.strip_prefix("0x")).or_else(|| s.strip_prefix('&'));
	match hex {
		Some(digits) => u16::from_str_radix(digits, 16),
		None => s.parse(),
	}
	.map_err(|_| format!("invalid address '{s}'"))
}

fn parse_ink_swap(s: &str) -> Result<InkSwap, String> {
	s.parse().map_err(|e: GfxError| e.to_string())
}

fn parse_mask(s: &str) -> Result<u8, String> {
	let value = parse_address(s)?;
	u8::try_from(value).map_err(|_| format!("mask '{s}' is not a byte"))
}

fn parse_size(s: &str) -> Result<Size, String> {
	let (w, h) = s.split_once(['x', 'X']).ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
	let width = w.parse().map_err(|_| format!("invalid width '{w}'"))?;
	let height = h.parse().map_err(|_| format!("invalid height '{h}'"))?;
	Ok(Size::new(width, height))
}

/// Loads the configuration file and applies the command line flags on top.
fn load_config(cli: &Cli) -> Result<ConvertConfig> {
	let mut config = match &cli.config {
		Some(path) => {
			let file = fs::File::open(path)
				.with_context(|| format!("Failed to open config {}", path.display()))?;
			ConvertConfig::from_reader(std::io::BufReader::new(file))?
		}
		None => ConvertConfig::default(),
	};
	if let Some(mode) = cli.mode {
		config.mode = mode;
	}
	if cli.sprite {
		config.sprite = true;
	}
	if cli.overscan {
		config.overscan = true;
	}
	if cli.line_width.is_some() {
		config.line_width = cli.line_width;
	}
	if let Some(swap) = &cli.ink_swap {
		config.ink_swap = swap.clone();
	}
	if let Some(value) = cli.mask {
		let op = if cli.mask_or { MaskOp::Or } else { MaskOp::And };
		config.mask = Some(SpriteMask::new(value, op));
	}
	Ok(config)
}

fn load_image(path: &Path) -> Result<RgbaImage> {
	let image = image::open(path).with_context(|| format!("Failed to load image {}", path.display()))?;
	Ok(image.to_rgba8())
}

/// Palette of an already quantized image.
fn image_palette(image: &RgbaImage, mode: Mode) -> Result<Palette> {
	let palette = Palette::from_image(image);
	palette.check_mode(mode).context("Image is not quantized for this mode")?;
	Ok(palette)
}

fn handle_encode(
	config: &ConvertConfig,
	input: &Path,
	output: &Path,
	amsdos_header: bool,
	asm: Option<&Path>,
	json: Option<&Path>,
	ocp: Option<&Path>,
) -> Result<()> {
	let image = load_image(input)?;
	let palette = image_palette(&image, config.mode)?;
	log::info!("Encoding {} ({}x{}, {palette})", input.display(), image.width(), image.height());

	let frame = config.finish_frame(encode(&image, &palette, config.mode, config.layout())?)?;
	let data = config.compression.compress(frame.as_bytes())?;
	let name = output.file_name().and_then(|n| n.to_str()).unwrap_or("DATA.BIN");
	let bytes = if amsdos_header {
		let layout = config.screen_layout();
		let load = if config.sprite { 0 } else { layout.base_address() };
		amsdos::wrap(name, &data, load, load)
	} else {
		data
	};
	fs::write(output, &bytes).with_context(|| format!("Failed to write {}", output.display()))?;
	println!("✓ Encoded {} -> {} ({} bytes)", input.display(), output.display(), bytes.len());

	if let Some(path) = asm {
		let mut source = format!("; {} {}{}", name, frame.size(), config.asm.eol);
		source.push_str(&config.asm.format_bytes(frame.as_bytes()));
		source.push_str(&format!("; palette{}", config.asm.eol));
		source.push_str(&config.asm.format_hardware_palette(&palette)?);
		fs::write(path, source)?;
		println!("✓ Assembly written to {}", path.display());
	}
	if let Some(path) = json {
		let export = JsonExport::new(name, image.width(), image.height(), frame.as_bytes(), &palette)?;
		fs::write(path, export.to_json()?)?;
		println!("✓ JSON written to {}", path.display());
	}
	if let Some(path) = ocp {
		let pal = OcpPalette::from_palette(&palette, config.mode)?;
		fs::write(path, pal.to_bytes())?;
		println!("✓ Palette written to {}", path.display());
	}
	Ok(())
}

fn handle_decode(
	config: &ConvertConfig,
	input: &Path,
	output: &Path,
	ocp: &Path,
	width: Option<u32>,
	height: u32,
) -> Result<()> {
	let pal = OcpPalette::from_bytes(&fs::read(ocp)?)
		.with_context(|| format!("Failed to parse palette {}", ocp.display()))?;
	let mode = pal.mode();
	let raw = fs::read(input)?;
	let data = amsdos::strip(&raw).to_vec();

	let layout = config.layout();
	let width =
		width.unwrap_or(u32::from(config.screen_layout().line_width) * mode.pixels_per_byte());
	let frame = PackedFrame::from_raw(data, mode, Size::new(width, height), layout)?;
	let image = decode(&frame, &pal.palette())?;
	image.save(output).with_context(|| format!("Failed to save {}", output.display()))?;
	println!("✓ Decoded {} -> {} ({width}x{height}, {mode})", input.display(), output.display());
	Ok(())
}

fn handle_delta(
	config: &ConvertConfig,
	frames: &[PathBuf],
	output: &Path,
	start: Option<u16>,
	max_frames: Option<usize>,
) -> Result<()> {
	let mut config = config.clone();
	if start.is_some() {
		config.start_address = start;
	}
	let max_frames = max_frames.unwrap_or(config.max_frames);

	let mut images = Vec::with_capacity(frames.len());
	for path in frames {
		let image = load_image(path)?;
		let palette = image_palette(&image, config.mode)?;
		images.push((image, palette));
	}

	let animation = DeltaAnimation::from_images(&images, config.mode, config.placement(), max_frames)?;
	for (i, delta) in animation.deltas().iter().enumerate() {
		log::info!("delta {i:02}: {delta}");
	}
	let source = delta_animation_source(&animation, &config.asm)?;
	fs::write(output, source)?;
	println!("✓ {} frame animation written to {}", animation.frame_count(), output.display());
	Ok(())
}

fn handle_tiles(
	config: &ConvertConfig,
	input: &Path,
	output: &Path,
	tile_size: Option<Size>,
	threshold: Option<f64>,
) -> Result<()> {
	let image = load_image(input)?;
	let palette = image_palette(&image, config.mode)?;

	let mut board = match tile_size {
		Some(size) => AnalyzeBoard::analyze(&image, size)?,
		None => choose_tile_size(&image, config.mode, config.tile_criteria)?,
	};
	println!("✓ {board}");
	if let Some(threshold) = threshold.or(config.tile_threshold) {
		board = board.reduce_tiles_number(threshold);
		println!("✓ Reduced to {} tiles", board.len());
	}

	let sorted = match board.sort() {
		Ok(sorted) => sorted,
		Err(err) if err.is_recoverable() => {
			log::warn!("{err}");
			let mut ranked = board.ranked();
			ranked.truncate(MAX_TILES);
			ranked
		}
		Err(err) => return Err(err.into()),
	};

	fs::create_dir_all(output)?;
	let map = TileMap::new(&board, &sorted)?;
	fs::write(output.join("tilesmap.map"), map.to_csv())?;
	fs::write(output.join("TILEMAP.TIL"), amsdos::wrap("TILEMAP.TIL", &map.til_bytes()?, 0, 0))?;
	let imp = imp_catcher(&sorted, &palette, config.mode)?;
	fs::write(output.join("TILES.IMP"), amsdos::wrap("TILES.IMP", &imp, 0x4000, 0))?;
	board.render().save(output.join("tiles_preview.png"))?;
	println!("✓ {} tiles, {}x{} map written to {}", sorted.len(), map.columns(), map.rows(), output.display());
	Ok(())
}

fn handle_sprites(
	config: &ConvertConfig,
	input: &Path,
	output: &Path,
	columns: u32,
	rows: u32,
) -> Result<()> {
	let image = load_image(input)?;
	fs::create_dir_all(output)?;

	if config.sprite_hard {
		let palette = image_palette(&image, Mode::Mode0)?;
		let file = SprFile::split_board(&image, &palette, columns, rows)?;
		let bytes = file.to_file("SPRITES.SPR", &config.compression)?;
		fs::write(output.join("SPRITES.SPR"), &bytes)?;
		for (i, sprite) in file.images(&palette).iter().enumerate() {
			sprite.save(output.join(format!("sprite_{i:02}.png")))?;
		}
		println!("✓ {} hardware sprites written to {}", file.sprites().len(), output.display());
		return Ok(());
	}

	let palette = image_palette(&image, config.mode)?;
	let sprites = encode_board(&image, &palette, columns, rows, config.mode)?;
	for (i, sprite) in sprites.into_iter().enumerate() {
		let sprite = config.finish_frame(sprite)?;
		let name = format!("SPR{i:02}.BIN");
		let data = config.compression.compress(sprite.as_bytes())?;
		fs::write(output.join(&name), amsdos::wrap(&name, &data, 0, 0))?;
		println!("✓ {name}: {} {} bytes", sprite.size(), data.len());
	}
	Ok(())
}

fn handle_palette(config: &ConvertConfig, input: &Path) -> Result<()> {
	let image = load_image(input)?;
	let palette = Palette::from_image(&image);
	if palette.len() > config.mode.colors_available() {
		bail!("{} colors found, {} allows {}", palette.len(), config.mode, config.mode.colors_available());
	}

	println!("{palette}");
	for (ink, color) in palette.iter().enumerate() {
		match firmware::lookup(color) {
			Some(fc) => println!(
				"  ink {ink:2}: {color} firmware {:2} hardware #{:02X} ({})",
				fc.firmware, fc.hardware, fc.name
			),
			None => println!("  ink {ink:2}: {color} not a firmware color"),
		}
	}
	if let Ok(hardware) = palette.hardware_values() {
		println!("  hardware: {}", hex::encode_upper(hardware));
	}
	Ok(())
}

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let config = load_config(&cli)?;

	match &cli.command {
		Commands::Encode {
			input,
			output,
			amsdos,
			asm,
			json,
			ocp,
			compression,
		} => {
			let mut config = config.clone();
			if let Some(id) = compression {
				config.compression = id.parse()?;
			}
			handle_encode(&config, input, output, *amsdos, asm.as_deref(), json.as_deref(), ocp.as_deref())
		}
		Commands::Decode {
			input,
			output,
			ocp,
			width,
			height,
		} => handle_decode(&config, input, output, ocp, *width, *height),
		Commands::Delta {
			frames,
			output,
			start,
			max_frames,
		} => handle_delta(&config, frames, output, *start, *max_frames),
		Commands::Tiles {
			input,
			output,
			tile_size,
			threshold,
		} => handle_tiles(&config, input, output, *tile_size, *threshold),
		Commands::Sprites {
			input,
			output,
			columns,
			rows,
			hard,
		} => {
			let mut config = config.clone();
			config.sprite_hard |= *hard;
			handle_sprites(&config, input, output, *columns, *rows)
		}
		Commands::Palette {
			input,
		} => handle_palette(&config, input),
	}
}
