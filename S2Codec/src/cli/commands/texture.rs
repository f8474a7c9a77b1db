//! CLI commands for texture operations

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use ddsfile::{Dds, DxgiFormat};

use super::TextureFormatArg;
use crate::cli::progress::{DISK, GEAR, LOOKING_GLASS, PICTURE, print_done, print_step, simple_spinner};
use crate::texture::{BptcVariant, TextureDecodeOptions, decode_bptc, decode_bptc_par, write_png};

/// Texture decode arguments as given on the command line
pub struct TextureArgs {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<TextureFormatArg>,
    pub hemi_oct: bool,
    pub invert_green: bool,
    pub parallel: bool,
}

/// Block stream plus the shape it should be decoded with
struct TextureSource {
    blocks: Vec<u8>,
    width: u32,
    height: u32,
    variant: BptcVariant,
}

fn is_dds(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dds"))
}

/// Map a DDS DXGI format onto a BPTC variant
fn dds_variant(format: Option<DxgiFormat>) -> anyhow::Result<BptcVariant> {
    match format {
        Some(DxgiFormat::BC6H_UF16 | DxgiFormat::BC6H_Typeless) => Ok(BptcVariant::Bc6h),
        Some(DxgiFormat::BC7_UNorm | DxgiFormat::BC7_UNorm_sRGB | DxgiFormat::BC7_Typeless) => {
            Ok(BptcVariant::Bc7)
        }
        Some(other) => anyhow::bail!("Unsupported DDS format {other:?}, expected BC6H_UF16 or BC7"),
        None => anyhow::bail!("DDS file has no DXGI format (legacy D3D formats are not BPTC)"),
    }
}

fn read_dds(input: &Path, args: &TextureArgs) -> anyhow::Result<TextureSource> {
    let file = std::fs::File::open(input)?;
    let dds = Dds::read(file).map_err(|e| anyhow::anyhow!("Failed to read DDS: {e}"))?;

    let variant = match args.format {
        Some(format) => format.into(),
        None => dds_variant(dds.get_dxgi_format())?,
    };
    // Mip 0 comes first in the layer data
    let blocks = dds
        .get_data(0)
        .map_err(|e| anyhow::anyhow!("No DDS data: {e}"))?
        .to_vec();

    Ok(TextureSource {
        blocks,
        width: args.width.unwrap_or_else(|| dds.get_width()),
        height: args.height.unwrap_or_else(|| dds.get_height()),
        variant,
    })
}

fn read_raw(input: &Path, args: &TextureArgs) -> anyhow::Result<TextureSource> {
    let (Some(width), Some(height), Some(format)) = (args.width, args.height, args.format) else {
        anyhow::bail!("Raw block streams need --width, --height and --format");
    };
    let blocks =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    Ok(TextureSource {
        blocks,
        width,
        height,
        variant: format.into(),
    })
}

/// Decode a BC6H/BC7 stream (raw or DDS) and write it as PNG.
pub fn execute(input: &Path, output: &Path, args: TextureArgs, show_progress: bool) -> anyhow::Result<()> {
    let start = Instant::now();

    if show_progress {
        print_step(1, 3, LOOKING_GLASS, &format!("Reading {}", input.display()));
    }
    let source = if is_dds(input) {
        read_dds(input, &args)?
    } else {
        read_raw(input, &args)?
    };

    let options = TextureDecodeOptions::new(source.variant)
        .with_hemi_oct_rb(args.hemi_oct)
        .with_invert_green(args.invert_green);

    if show_progress {
        print_step(
            2,
            3,
            GEAR,
            &format!(
                "Decoding {} {}x{}",
                source.variant.name(),
                source.width,
                source.height
            ),
        );
    }
    let spinner = show_progress.then(|| simple_spinner("Decoding blocks..."));
    let decoded = if args.parallel {
        decode_bptc_par(&source.blocks, source.width, source.height, &options)
    } else {
        decode_bptc(&source.blocks, source.width, source.height, &options)
    };
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let rgba = decoded?;

    if show_progress {
        print_step(3, 3, DISK, &format!("Writing {}", output.display()));
    }
    write_png(output, source.width, source.height, &rgba)?;

    if show_progress {
        println!("{PICTURE}{}x{} PNG written", source.width, source.height);
        print_done(start.elapsed());
    }

    Ok(())
}
