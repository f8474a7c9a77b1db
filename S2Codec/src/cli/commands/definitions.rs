//! Argument value types for CLI

use clap::ValueEnum;

use crate::texture::BptcVariant;

/// Block format of a raw texture stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextureFormatArg {
    /// BC6H unsigned half float
    Bc6h,
    /// BC7
    Bc7,
}

impl From<TextureFormatArg> for BptcVariant {
    fn from(arg: TextureFormatArg) -> Self {
        match arg {
            TextureFormatArg::Bc6h => BptcVariant::Bc6h,
            TextureFormatArg::Bc7 => BptcVariant::Bc7,
        }
    }
}
