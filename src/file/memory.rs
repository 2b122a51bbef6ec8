use super::Backend;

#[derive(Debug)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Create a new memory backend
    ///
    /// ## Arguments
    /// * 'data' - The data buffer to consume
    pub fn new(data: Vec<u8>) -> Memory {
        Memory { data }
    }
}

impl Backend for Memory {
    fn data(&self) -> &[u8] {
        self.data.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn memory() {
        let mut data = vec![0xCC_u8; 64];
        data[10..14].copy_from_slice(b"IREP");

        let memory = Memory::new(data);

        assert_eq!(memory.len(), 64);
        assert_eq!(memory.data()[0], 0xCC);
        assert_eq!(memory.data_slice(10, 4).unwrap(), b"IREP");

        assert!(memory
            .data_slice(u32::MAX as usize, u32::MAX as usize)
            .is_err());
        assert!(memory.data_slice(0, 128).is_err());
    }

    #[test]
    fn offset_overflow() {
        let memory = Memory::new(vec![0x00; 16]);

        let result = memory.data_slice(usize::MAX, 1);
        assert!(matches!(result, Err(Error::TruncatedInput { .. })));

        let result = memory.data_slice(15, 2);
        assert!(matches!(
            result,
            Err(Error::TruncatedInput {
                offset: 15,
                needed: 2,
                available: 1
            })
        ));

        let empty: &[u8] = &[];
        assert_eq!(memory.data_slice(16, 0).unwrap(), empty);
    }
}
