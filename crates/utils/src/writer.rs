use std::io::{self, Seek, Write};

/// Positioned little-endian writer, the counterpart of
/// [`DataReader`](crate::reader::DataReader).
pub trait DataWriter {
    fn write_u8(&mut self, value: u8) -> io::Result<()>;
    fn write_u16_le(&mut self, value: u16) -> io::Result<()>;
    fn write_u32_le(&mut self, value: u32) -> io::Result<()>;
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;
    fn tell(&mut self) -> io::Result<u32>;

    fn write_i16_le(&mut self, value: i16) -> io::Result<()> {
        self.write_u16_le(value as u16)
    }

    fn write_i32_le(&mut self, value: i32) -> io::Result<()> {
        self.write_u32_le(value as u32)
    }

    /// Writes a `u16`-length-prefixed UTF-8 string. Fails if the string is
    /// longer than `u16::MAX` bytes.
    fn write_str_u16(&mut self, value: &str) -> io::Result<()> {
        let len = u16::try_from(value.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "string longer than 65535 bytes")
        })?;
        self.write_u16_le(len)?;
        self.write_all(value.as_bytes())
    }
}

impl<T> DataWriter for Box<T>
where
    T: DataWriter + ?Sized,
{
    fn write_u8(&mut self, value: u8) -> io::Result<()> {
        (**self).write_u8(value)
    }

    fn write_u16_le(&mut self, value: u16) -> io::Result<()> {
        (**self).write_u16_le(value)
    }

    fn write_u32_le(&mut self, value: u32) -> io::Result<()> {
        (**self).write_u32_le(value)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        (**self).write_all(buf)
    }

    fn tell(&mut self) -> io::Result<u32> {
        (**self).tell()
    }
}

/// [`DataWriter`] over any `Write + Seek` sink.
pub struct IoDataWriter<W>(W);

impl<W: Write + Seek> IoDataWriter<W> {
    pub fn new(writer: W) -> IoDataWriter<W> {
        IoDataWriter(writer)
    }

    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: Write + Seek> DataWriter for IoDataWriter<W> {
    fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.0.write_all(&[value])
    }

    fn write_u16_le(&mut self, value: u16) -> io::Result<()> {
        self.0.write_all(&value.to_le_bytes())
    }

    fn write_u32_le(&mut self, value: u32) -> io::Result<()> {
        self.0.write_all(&value.to_le_bytes())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.0.write_all(buf)
    }

    fn tell(&mut self) -> io::Result<u32> {
        let pos = self.0.stream_position()?;
        u32::try_from(pos)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "stream exceeds 4 GiB"))
    }
}
