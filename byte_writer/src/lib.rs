//! Little-endian byte buffer shared by the sprite and image encoders.

#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    pub data: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Current write position, which is also the length written so far.
    pub fn get_offset(&self) -> usize {
        self.data.len()
    }

    pub fn append_u8(&mut self, i: u8) {
        self.data.push(i);
    }

    pub fn append_u16(&mut self, i: u16) {
        self.data.extend(i.to_le_bytes());
    }

    pub fn append_i16(&mut self, i: i16) {
        self.data.extend(i.to_le_bytes());
    }

    pub fn append_u32(&mut self, i: u32) {
        self.data.extend(i.to_le_bytes());
    }

    pub fn append_i32(&mut self, i: i32) {
        self.data.extend(i.to_le_bytes());
    }

    pub fn append_u8_slice(&mut self, i: &[u8]) {
        self.data.extend_from_slice(i);
    }

    pub fn append_zeroes(&mut self, count: usize) {
        self.data.resize(self.data.len() + count, 0);
    }

    /// Pads with zeroes until the buffer is `length` bytes long. Does nothing if it is already longer.
    pub fn pad_to(&mut self, length: usize) {
        if self.data.len() < length {
            self.data.resize(length, 0);
        }
    }

    pub fn replace(&mut self, start: usize, slice: &[u8]) {
        self.data[start..(start + slice.len())].copy_from_slice(slice);
    }

    pub fn replace_with_u32(&mut self, start: usize, val: u32) {
        self.replace(start, &val.to_le_bytes());
    }
}

#[cfg(test)]
mod test {
    use super::ByteWriter;

    #[test]
    fn appends_little_endian() {
        let mut writer = ByteWriter::new();

        writer.append_u8(0x0a);
        writer.append_u16(0x0201);
        writer.append_i16(-2);
        writer.append_u32(0x0605_0403);

        assert_eq!(
            writer.data,
            [0x0a, 0x01, 0x02, 0xfe, 0xff, 0x03, 0x04, 0x05, 0x06]
        );
        assert_eq!(writer.get_offset(), 9);
    }

    #[test]
    fn patches_written_offset() {
        let mut writer = ByteWriter::new();

        let slot = writer.get_offset();
        writer.append_u32(0);
        writer.append_zeroes(3);
        writer.replace_with_u32(slot, 7);
        writer.pad_to(10);

        assert_eq!(writer.data, [7, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }
}
