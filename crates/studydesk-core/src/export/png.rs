//! Minimal PNG chunk reader for image embedding

use crate::error::{Result, StudyDeskError};

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Header fields and raw image data of a PNG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngInfo {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub interlace: u8,
    /// PLTE contents (RGB triples), empty when absent
    pub palette: Vec<u8>,
    /// tRNS contents, empty when absent
    pub transparency: Vec<u8>,
    /// Concatenated IDAT payloads (a zlib stream)
    pub idat: Vec<u8>,
}

impl PngInfo {
    /// Parse chunks; CRCs are not verified
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 8 || bytes[..8] != SIGNATURE {
            return Err(StudyDeskError::Parse("not a PNG image".to_string()));
        }

        let mut pos = 8;
        let mut header: Option<(u32, u32, u8, u8, u8)> = None;
        let mut palette = Vec::new();
        let mut transparency = Vec::new();
        let mut idat = Vec::new();

        while pos + 8 <= bytes.len() {
            let length = read_u32(&bytes[pos..pos + 4]) as usize;
            let kind = &bytes[pos + 4..pos + 8];
            let data_start = pos + 8;
            let data_end = data_start
                .checked_add(length)
                .filter(|end| end + 4 <= bytes.len())
                .ok_or_else(|| StudyDeskError::Parse("truncated PNG chunk".to_string()))?;
            let data = &bytes[data_start..data_end];

            match kind {
                b"IHDR" => {
                    if data.len() < 13 {
                        return Err(StudyDeskError::Parse("short IHDR chunk".to_string()));
                    }
                    header = Some((
                        read_u32(&data[0..4]),
                        read_u32(&data[4..8]),
                        data[8],
                        data[9],
                        data[12],
                    ));
                }
                b"PLTE" => palette.extend_from_slice(data),
                b"tRNS" => transparency.extend_from_slice(data),
                b"IDAT" => idat.extend_from_slice(data),
                b"IEND" => break,
                _ => {}
            }

            pos = data_end + 4;
        }

        let (width, height, bit_depth, color_type, interlace) =
            header.ok_or_else(|| StudyDeskError::Parse("PNG without IHDR".to_string()))?;

        if width == 0 || height == 0 {
            return Err(StudyDeskError::Parse("PNG with empty dimensions".to_string()));
        }
        if idat.is_empty() {
            return Err(StudyDeskError::Parse("PNG without image data".to_string()));
        }

        Ok(Self {
            width,
            height,
            bit_depth,
            color_type,
            interlace,
            palette,
            transparency,
            idat,
        })
    }

    /// Colour components per pixel, `None` for layouts carrying alpha
    pub fn colors(&self) -> Option<u8> {
        match self.color_type {
            0 | 3 => Some(1),
            2 => Some(3),
            _ => None,
        }
    }

    /// Colour-key ranges (min/max per component) for the transparent samples.
    ///
    /// Indexed images use the fully transparent palette entries; when they
    /// are not contiguous only the first run is keyed. Partial alpha is
    /// treated as opaque.
    pub fn color_key_mask(&self) -> Option<Vec<i64>> {
        if self.transparency.is_empty() {
            return None;
        }
        match self.color_type {
            0 if self.transparency.len() >= 2 => {
                let gray = read_u16(&self.transparency[0..2]) as i64;
                Some(vec![gray, gray])
            }
            2 if self.transparency.len() >= 6 => Some(
                self.transparency
                    .chunks(2)
                    .take(3)
                    .flat_map(|c| {
                        let v = read_u16(c) as i64;
                        [v, v]
                    })
                    .collect(),
            ),
            3 => {
                let first = self.transparency.iter().position(|a| *a == 0)?;
                let run = self.transparency[first..]
                    .iter()
                    .take_while(|a| **a == 0)
                    .count();
                Some(vec![first as i64, (first + run - 1) as i64])
            }
            _ => None,
        }
    }

    /// Whether the IDAT stream can be handed to a PDF Flate/PNG-predictor decoder as is
    pub fn is_pdf_embeddable(&self) -> bool {
        self.interlace == 0
            && self.colors().is_some()
            && match self.color_type {
                3 => matches!(self.bit_depth, 1 | 2 | 4 | 8) && !self.palette.is_empty(),
                _ => self.bit_depth == 8,
            }
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn read_u16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}


#[cfg(test)]
mod tests {
    use super::testing::{tiny_indexed_png, tiny_png};
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        let info = PngInfo::parse(&tiny_png(7, 3)).unwrap();
        assert_eq!((info.width, info.height), (7, 3));
        assert_eq!(info.color_type, 0);
        assert_eq!(info.colors(), Some(1));
        assert!(info.is_pdf_embeddable());
    }

    #[test]
    fn test_rejects_non_png() {
        assert!(PngInfo::parse(b"GIF89a").is_err());
        assert!(PngInfo::parse(&[]).is_err());
    }

    #[test]
    fn test_rejects_truncated_chunk() {
        let mut png = tiny_png(2, 2);
        png.truncate(20);
        assert!(PngInfo::parse(&png).is_err());
    }

    #[test]
    fn test_alpha_is_not_embeddable() {
        let mut info = PngInfo::parse(&tiny_png(1, 1)).unwrap();
        info.color_type = 6;
        assert!(info.colors().is_none());
        assert!(!info.is_pdf_embeddable());
    }

    #[test]
    fn test_transparent_palette_entries_become_color_key() {
        let palette = [255, 255, 255, 0, 0, 0, 128, 128, 128];
        let info = PngInfo::parse(&tiny_indexed_png(3, 2, &palette, &[255, 0, 0])).unwrap();
        assert_eq!(info.transparency, vec![255, 0, 0]);
        assert!(info.is_pdf_embeddable());
        assert_eq!(info.color_key_mask(), Some(vec![1, 2]));

        let opaque = PngInfo::parse(&tiny_indexed_png(3, 2, &palette, &[])).unwrap();
        assert_eq!(opaque.color_key_mask(), None);

        let partial = PngInfo::parse(&tiny_indexed_png(3, 2, &palette, &[0, 128, 0])).unwrap();
        assert_eq!(partial.color_key_mask(), Some(vec![0, 0]));
    }

    #[test]
    fn test_gray_and_rgb_color_keys() {
        let mut info = PngInfo::parse(&tiny_png(1, 1)).unwrap();
        info.transparency = vec![0x00, 0xFF];
        assert_eq!(info.color_key_mask(), Some(vec![255, 255]));

        info.color_type = 2;
        info.transparency = vec![0, 1, 0, 2, 0, 3];
        assert_eq!(info.color_key_mask(), Some(vec![1, 1, 2, 2, 3, 3]));
    }

    #[test]
    fn test_indexed_needs_palette() {
        let mut info = PngInfo::parse(&tiny_png(1, 1)).unwrap();
        info.color_type = 3;
        assert!(!info.is_pdf_embeddable());
        info.palette = vec![255, 255, 255];
        assert!(info.is_pdf_embeddable());
    }
}
