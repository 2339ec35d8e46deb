//! crates/batch/src/wire.rs
//!
//! Little-endian integer and payload primitives.

use std::io::{self, Read, Write};

pub(crate) fn write_u8<W: Write + ?Sized>(writer: &mut W, value: u8) -> io::Result<()> {
    writer.write_all(&[value])
}

pub(crate) fn write_u32<W: Write + ?Sized>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

pub(crate) fn write_u64<W: Write + ?Sized>(writer: &mut W, value: u64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

pub(crate) fn read_array<const N: usize, R: Read + ?Sized>(reader: &mut R) -> io::Result<[u8; N]> {
    let mut bytes = [0u8; N];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

pub(crate) fn read_u8<R: Read + ?Sized>(reader: &mut R) -> io::Result<u8> {
    read_array::<1, R>(reader).map(|[byte]| byte)
}

pub(crate) fn read_u32<R: Read + ?Sized>(reader: &mut R) -> io::Result<u32> {
    read_array(reader).map(u32::from_le_bytes)
}

pub(crate) fn read_u64<R: Read + ?Sized>(reader: &mut R) -> io::Result<u64> {
    read_array(reader).map(u64::from_le_bytes)
}

/// Reads exactly `len` bytes without trusting `len` for a single up-front
/// allocation.
pub(crate) fn read_payload<R: Read + ?Sized>(reader: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut payload = Vec::new();
    let read = reader.take(len as u64).read_to_end(&mut payload)?;
    if read < len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("payload truncated: expected {len} bytes, got {read}"),
        ));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn integers_are_little_endian() {
        let mut out = Vec::new();
        write_u32(&mut out, 0x0102_0304).unwrap();
        write_u64(&mut out, 5).unwrap();
        write_u8(&mut out, 9).unwrap();
        assert_eq!(&out[..4], &[4, 3, 2, 1]);

        let mut cursor = Cursor::new(out);
        assert_eq!(read_u32(&mut cursor).unwrap(), 0x0102_0304);
        assert_eq!(read_u64(&mut cursor).unwrap(), 5);
        assert_eq!(read_u8(&mut cursor).unwrap(), 9);
    }

    #[test]
    fn truncated_payload_is_unexpected_eof() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        let err = read_payload(&mut cursor, 10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
