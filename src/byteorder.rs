pub trait WriteBytesLe {
    fn write_le(&self, dst: &mut Vec<u8>);
}

macro_rules! impl_num_le {
    ($($t:ty),+) => { $(
        impl WriteBytesLe for $t { #[inline] fn write_le(&self, dst: &mut Vec<u8>) { dst.extend_from_slice(&self.to_le_bytes()); }}
    )+ }
}

impl_num_le!(u8, u16, u32, u64);

impl<T: WriteBytesLe, const N: usize> WriteBytesLe for [T; N] {
    #[inline]
    fn write_le(&self, dst: &mut Vec<u8>) {
        self.iter().for_each(|item| item.write_le(dst));
    }
}

#[cfg(test)]
mod tests {
    use crate::byteorder::WriteBytesLe;
    use castools_macros::ToBytes;

    #[derive(ToBytes)]
    struct Mini {
        a: u16,
        b: u32,
        id: [u8; 4],
    }

    #[test]
    fn to_bytes_le() {
        let s = Mini {
            a: 0x1234,
            b: 0xABCDEF01,
            id: *b"data",
        };

        let vec_le = &mut Vec::new();
        s.write_le(vec_le);

        let expected_le = [0x34, 0x12, 0x01, 0xEF, 0xCD, 0xAB, b'd', b'a', b't', b'a'];
        assert_eq!(&vec_le[..], &expected_le);
    }
}
