// Conversion between 24-bit color text and 15-bit BGR hardware words
// (bits 0-4 red, 5-9 green, 10-14 blue, bit 15 unused).

use serde::{Deserialize, Serialize};

use crate::{
    common::{ColorRGB, ColorValue, ColorWord, PaletteIdx},
    error::CodecError,
    state::Palette,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    fn word_to_bytes(self, w: ColorWord) -> [u8; 2] {
        match self {
            Endianness::Little => w.to_le_bytes(),
            Endianness::Big => w.to_be_bytes(),
        }
    }

    fn word_from_bytes(self, b: [u8; 2]) -> ColorWord {
        match self {
            Endianness::Little => ColorWord::from_le_bytes(b),
            Endianness::Big => ColorWord::from_be_bytes(b),
        }
    }
}

// round(c / 255 * 31); c * 31 / 255 never lands on exactly .5, so
// integer round-half-up matches.
fn quantize(c: ColorValue) -> ColorWord {
    ((c as u32 * 31 + 127) / 255).min(31) as ColorWord
}

fn expand(v: ColorWord) -> ColorValue {
    let v = (v & 31) as u8;
    (v << 3) | (v >> 2)
}

pub fn rgb_to_word(r: ColorValue, g: ColorValue, b: ColorValue) -> ColorWord {
    quantize(b) << 10 | quantize(g) << 5 | quantize(r)
}

pub fn word_to_rgb(w: ColorWord) -> ColorRGB {
    (expand(w), expand(w >> 5), expand(w >> 10))
}

/// Parses `#RRGGBB`, `RRGGBB` or `#RGB` (case-insensitive).
pub fn parse_color(text: &str) -> Option<ColorRGB> {
    let text = text.trim();
    let hex = text.strip_prefix('#').unwrap_or(text);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 if text.starts_with('#') => {
            let r = channel(&hex[0..1])?;
            let g = channel(&hex[1..2])?;
            let b = channel(&hex[2..3])?;
            Some((r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

pub fn format_color((r, g, b): ColorRGB) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// A palette slot whose color text could not be parsed. `raw` is empty when
/// the slot was missing altogether.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorFailure {
    pub palette: PaletteIdx,
    pub entry: usize,
    pub raw: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializedPalettes {
    pub bytes: Vec<u8>,
    pub failures: Vec<ColorFailure>,
}

impl SerializedPalettes {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Packs `expected_count` palettes of `entries_per_palette` colors each.
/// Unparseable or missing colors are written as 0 and reported in
/// `failures`; the output length never depends on the input.
pub fn serialize_palettes(
    palettes: &[Palette],
    expected_count: usize,
    entries_per_palette: usize,
    endianness: Endianness,
) -> SerializedPalettes {
    let mut bytes = Vec::with_capacity(expected_count * entries_per_palette * 2);
    let mut failures = vec![];
    for p in 0..expected_count {
        for e in 0..entries_per_palette {
            let raw = palettes.get(p).and_then(|pal| pal.colors.get(e));
            let word = match raw.and_then(|s| parse_color(s)) {
                Some((r, g, b)) => rgb_to_word(r, g, b),
                None => {
                    failures.push(ColorFailure {
                        palette: p,
                        entry: e,
                        raw: raw.cloned().unwrap_or_default(),
                    });
                    0
                }
            };
            bytes.extend(endianness.word_to_bytes(word));
        }
    }
    SerializedPalettes { bytes, failures }
}

pub fn deserialize_palettes(
    data: &[u8],
    expected_count: usize,
    entries_per_palette: usize,
    endianness: Endianness,
) -> Result<Vec<Palette>, CodecError> {
    let expected = expected_count * entries_per_palette * 2;
    if data.len() != expected {
        return Err(CodecError::PaletteSize {
            expected,
            actual: data.len(),
        });
    }
    let words: Vec<ColorWord> = data
        .chunks_exact(2)
        .map(|b| endianness.word_from_bytes([b[0], b[1]]))
        .collect();
    Ok((0..expected_count)
        .map(|i| {
            let start = i * entries_per_palette;
            Palette {
                name: format!("Palette {}", i),
                colors: words[start..start + entries_per_palette]
                    .iter()
                    .map(|&w| format_color(word_to_rgb(w)))
                    .collect(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{PALETTE_COLORS, PALETTE_COUNT};

    #[test]
    fn word_layout_is_bgr() {
        assert_eq!(rgb_to_word(255, 0, 0), 0x001F);
        assert_eq!(rgb_to_word(0, 255, 0), 0x03E0);
        assert_eq!(rgb_to_word(0, 0, 255), 0x7C00);
        assert_eq!(rgb_to_word(255, 255, 255), 0x7FFF);
    }

    #[test]
    fn quantization_rounds_to_nearest() {
        // 128 / 255 * 31 = 15.56
        assert_eq!(rgb_to_word(128, 0, 0), 16);
        // 4 / 255 * 31 = 0.49
        assert_eq!(rgb_to_word(4, 0, 0), 0);
        assert_eq!(rgb_to_word(5, 0, 0), 1);
    }

    #[test]
    fn expansion_replicates_high_bits() {
        assert_eq!(word_to_rgb(0x7FFF), (255, 255, 255));
        assert_eq!(word_to_rgb(0x0000), (0, 0, 0));
        assert_eq!(word_to_rgb(0x8000), (0, 0, 0));
        assert_eq!(word_to_rgb(16), (132, 0, 0));
    }

    #[test]
    fn representable_colors_round_trip() {
        for v in 0..32u16 {
            let c = expand(v);
            assert_eq!(word_to_rgb(rgb_to_word(c, c, c)), (c, c, c));
            assert_eq!(word_to_rgb(rgb_to_word(c, 0, 255 - c)), (c, 0, 255 - c));
        }
    }

    #[test]
    fn every_word_round_trips() {
        for w in 0..0x8000u16 {
            let (r, g, b) = word_to_rgb(w);
            assert_eq!(rgb_to_word(r, g, b), w);
        }
    }

    #[test]
    fn parses_color_text() {
        assert_eq!(parse_color("#FF8000"), Some((255, 128, 0)));
        assert_eq!(parse_color("  00ff00 "), Some((0, 255, 0)));
        assert_eq!(parse_color("#f0a"), Some((255, 0, 170)));
        assert_eq!(parse_color("f0a"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#gg0000"), None);
        assert_eq!(parse_color("red"), None);
        assert_eq!(parse_color("#+1+2+3"), None);
    }

    fn palette(colors: &[&str]) -> Palette {
        Palette {
            name: "test".to_string(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn serialization_has_fixed_length() {
        let out = serialize_palettes(&[], PALETTE_COUNT, PALETTE_COLORS, Endianness::Little);
        assert_eq!(out.bytes.len(), 256);
        assert_eq!(out.failures.len(), 128);
        assert!(out.failures.iter().all(|f| f.raw.is_empty()));
    }

    #[test]
    fn failures_do_not_abort() {
        let pals = vec![palette(&["#ffffff", "bogus", "#0000ff"])];
        let out = serialize_palettes(&pals, 1, 3, Endianness::Little);
        assert_eq!(out.bytes, vec![0xFF, 0x7F, 0x00, 0x00, 0x00, 0x7C]);
        assert_eq!(
            out.failures,
            vec![ColorFailure {
                palette: 0,
                entry: 1,
                raw: "bogus".to_string()
            }]
        );
        assert!(!out.is_complete());
    }

    #[test]
    fn big_endian_swaps_bytes() {
        let pals = vec![palette(&["#0000ff"])];
        let out = serialize_palettes(&pals, 1, 1, Endianness::Big);
        assert_eq!(out.bytes, vec![0x7C, 0x00]);
        assert!(out.is_complete());
    }

    #[test]
    fn deserialize_checks_length_and_decodes() {
        assert_eq!(
            deserialize_palettes(&[0; 10], 1, 4, Endianness::Little),
            Err(CodecError::PaletteSize {
                expected: 8,
                actual: 10
            })
        );
        let pals = deserialize_palettes(&[0x1F, 0x00, 0x00, 0x7C], 2, 1, Endianness::Little).unwrap();
        assert_eq!(pals.len(), 2);
        assert_eq!(pals[0].colors, vec!["#ff0000".to_string()]);
        assert_eq!(pals[1].colors, vec!["#0000ff".to_string()]);
    }

    #[test]
    fn zero_entries_still_yields_every_palette() {
        let pals = deserialize_palettes(&[], 2, 0, Endianness::Little).unwrap();
        assert_eq!(pals.len(), 2);
        assert!(pals.iter().all(|p| p.colors.is_empty()));
        assert_eq!(pals[1].name, "Palette 1");
    }
}
