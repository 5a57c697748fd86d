use std::io;

use fernwood_utils::{DataReader, DataWriter};

/// RGB565 screenshot stored in a save header.
///
/// Serialized as a presence byte, then `u16` width, `u16` height and
/// `width * height * 2` pixel bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

impl Thumbnail {
    /// Fails when `pixels` is not exactly `width * height` RGB565 pixels.
    pub fn new(width: u16, height: u16, pixels: Vec<u8>) -> io::Result<Self> {
        if pixels.len() != pixel_bytes(width, height) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "thumbnail data is {} bytes, expected {} for {width}x{height}",
                    pixels.len(),
                    pixel_bytes(width, height)
                ),
            ));
        }
        Ok(Thumbnail {
            width,
            height,
            pixels,
        })
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn read<R: DataReader>(reader: &mut R) -> io::Result<Option<Self>> {
        if reader.read_u8()? == 0 {
            return Ok(None);
        }
        let width = reader.read_u16_le()?;
        let height = reader.read_u16_le()?;
        let len = checked_pixel_len(reader, width, height)?;
        let pixels = reader.read_bytes(len as usize)?;
        Ok(Some(Thumbnail {
            width,
            height,
            pixels,
        }))
    }

    /// Consumes a serialized thumbnail without keeping the pixel data.
    pub(crate) fn skip<R: DataReader>(reader: &mut R) -> io::Result<()> {
        if reader.read_u8()? == 0 {
            return Ok(());
        }
        let width = reader.read_u16_le()?;
        let height = reader.read_u16_le()?;
        let len = checked_pixel_len(reader, width, height)?;
        reader.skip(len)
    }

    pub(crate) fn write_opt<W: DataWriter>(
        writer: &mut W,
        thumbnail: Option<&Self>,
    ) -> io::Result<()> {
        match thumbnail {
            None => writer.write_u8(0),
            Some(thumb) => {
                writer.write_u8(1)?;
                writer.write_u16_le(thumb.width)?;
                writer.write_u16_le(thumb.height)?;
                writer.write_all(&thumb.pixels)
            }
        }
    }
}

fn pixel_bytes(width: u16, height: u16) -> usize {
    usize::from(width) * usize::from(height) * 2
}

/// The dimensions come from untrusted header bytes, so the claimed pixel
/// size is validated against the bytes actually left in the stream before
/// anything is allocated or skipped.
fn checked_pixel_len<R: DataReader>(reader: &mut R, width: u16, height: u16) -> io::Result<u32> {
    let claimed = pixel_bytes(width, height) as u64;
    let remaining =
        u64::from(reader.stream_size()?).saturating_sub(u64::from(reader.tell()?));
    if claimed > remaining {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("thumbnail claims {claimed} pixel bytes but only {remaining} remain"),
        ));
    }
    // claimed <= remaining <= u32::MAX here.
    Ok(claimed as u32)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use fernwood_utils::{IoDataReader, IoDataWriter};

    use super::*;

    #[test]
    fn size_must_match_dimensions() {
        assert!(Thumbnail::new(4, 3, vec![0; 24]).is_ok());
        assert!(Thumbnail::new(4, 3, vec![0; 23]).is_err());
    }

    #[test]
    fn absent_thumbnail_is_one_byte() {
        let mut writer = IoDataWriter::new(Cursor::new(Vec::new()));
        Thumbnail::write_opt(&mut writer, None).unwrap();
        let data = writer.into_inner().into_inner();
        assert_eq!(data, vec![0]);

        let mut reader = IoDataReader::new(Cursor::new(data));
        assert!(Thumbnail::read(&mut reader).unwrap().is_none());
    }

    #[test]
    fn oversized_claim_is_rejected_before_allocating() {
        // Presence byte, then 0xFFFF x 0xFFFF with no pixel data behind it.
        let data = vec![1, 0xFF, 0xFF, 0xFF, 0xFF];

        let mut reader = IoDataReader::new(Cursor::new(data.clone()));
        let err = Thumbnail::read(&mut reader).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);

        let mut reader = IoDataReader::new(Cursor::new(data));
        assert!(Thumbnail::skip(&mut reader).is_err());
    }

    #[test]
    fn skip_lands_after_pixels() {
        let thumb = Thumbnail::new(3, 2, vec![0xEE; 12]).unwrap();
        let mut writer = IoDataWriter::new(Cursor::new(Vec::new()));
        Thumbnail::write_opt(&mut writer, Some(&thumb)).unwrap();
        let data = writer.into_inner().into_inner();
        let len = data.len() as u32;

        let mut reader = IoDataReader::new(Cursor::new(data));
        Thumbnail::skip(&mut reader).unwrap();
        assert_eq!(reader.tell().unwrap(), len);
    }
}
