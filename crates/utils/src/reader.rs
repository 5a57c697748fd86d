use std::io::{self, Read, Seek};

/// Positioned little-endian reader over a byte stream.
///
/// All multi-byte reads are little-endian. Strings are stored as a `u16`
/// byte length followed by UTF-8 data; a malformed string surfaces as an
/// `InvalidData` I/O error.
pub trait DataReader {
    fn read_u8(&mut self) -> io::Result<u8>;
    fn read_u16_le(&mut self) -> io::Result<u16>;
    fn read_u32_le(&mut self) -> io::Result<u32>;
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;
    fn seek_to(&mut self, offset: u32) -> io::Result<()>;
    fn tell(&mut self) -> io::Result<u32>;
    fn stream_size(&mut self) -> io::Result<u32>;

    fn read_i16_le(&mut self) -> io::Result<i16> {
        Ok(self.read_u16_le()? as i16)
    }

    fn read_i32_le(&mut self) -> io::Result<i32> {
        Ok(self.read_u32_le()? as i32)
    }

    fn read_bytes(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads a `u16`-length-prefixed UTF-8 string.
    fn read_str_u16(&mut self) -> io::Result<String> {
        let len = self.read_u16_le()? as usize;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    /// Advances past `count` bytes without interpreting them.
    fn skip(&mut self, count: u32) -> io::Result<()> {
        let pos = self.tell()?;
        self.seek_to(pos.checked_add(count).ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "skip past end of stream")
        })?)
    }
}

impl<T> DataReader for Box<T>
where
    T: DataReader + ?Sized,
{
    fn read_u8(&mut self) -> io::Result<u8> {
        (**self).read_u8()
    }

    fn read_u16_le(&mut self) -> io::Result<u16> {
        (**self).read_u16_le()
    }

    fn read_u32_le(&mut self) -> io::Result<u32> {
        (**self).read_u32_le()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_exact(buf)
    }

    fn seek_to(&mut self, offset: u32) -> io::Result<()> {
        (**self).seek_to(offset)
    }

    fn tell(&mut self) -> io::Result<u32> {
        (**self).tell()
    }

    fn stream_size(&mut self) -> io::Result<u32> {
        (**self).stream_size()
    }
}

/// [`DataReader`] over any `Read + Seek` source.
pub struct IoDataReader<R>(R);

impl<R: Read + Seek> IoDataReader<R> {
    pub fn new(reader: R) -> IoDataReader<R> {
        IoDataReader(reader)
    }

    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: Read + Seek> DataReader for IoDataReader<R> {
    fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0; 1];
        self.0.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u16_le(&mut self) -> io::Result<u16> {
        let mut buf = [0; 2];
        self.0.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_u32_le(&mut self) -> io::Result<u32> {
        let mut buf = [0; 4];
        self.0.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.0.read_exact(buf)
    }

    fn seek_to(&mut self, offset: u32) -> io::Result<()> {
        self.0.seek(io::SeekFrom::Start(u64::from(offset)))?;
        Ok(())
    }

    fn tell(&mut self) -> io::Result<u32> {
        stream_offset(self.0.stream_position()?)
    }

    fn stream_size(&mut self) -> io::Result<u32> {
        let curr = self.0.stream_position()?;
        let end = self.0.seek(io::SeekFrom::End(0))?;
        self.0.seek(io::SeekFrom::Start(curr))?;
        stream_offset(end)
    }
}

fn stream_offset(pos: u64) -> io::Result<u32> {
    u32::try_from(pos)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "stream exceeds 4 GiB"))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_le_integers() {
        let mut reader = IoDataReader::new(Cursor::new(vec![0x2A, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12]));
        assert_eq!(reader.read_u8().unwrap(), 0x2A);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le().unwrap(), 0x12345678);
        assert_eq!(reader.tell().unwrap(), 7);
    }

    #[test]
    fn reads_prefixed_string() {
        let mut data = vec![5, 0];
        data.extend_from_slice(b"ferns");
        let mut reader = IoDataReader::new(Cursor::new(data));
        assert_eq!(reader.read_str_u16().unwrap(), "ferns");
    }

    #[test]
    fn invalid_utf8_is_invalid_data() {
        let mut reader = IoDataReader::new(Cursor::new(vec![2, 0, 0xFF, 0xFE]));
        let err = reader.read_str_u16().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn truncated_read_fails() {
        let mut reader = IoDataReader::new(Cursor::new(vec![0x01]));
        assert!(reader.read_u32_le().is_err());
    }

    #[test]
    fn skip_advances_position() {
        let mut reader = IoDataReader::new(Cursor::new(vec![0; 16]));
        reader.skip(10).unwrap();
        assert_eq!(reader.tell().unwrap(), 10);
        assert_eq!(reader.stream_size().unwrap(), 16);
        assert_eq!(reader.tell().unwrap(), 10);
    }
}
