#![no_main]

use buffer::ByteReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 8;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_bool();
            }
            1 => {
                let _ = reader.read_var_u32();
            }
            2 => {
                let _ = reader.read_var_i64();
            }
            3 => {
                let max = usize::from(data[idx.saturating_sub(1)]);
                let _ = reader.read_byte_array(max);
            }
            4 => {
                let _ = reader.read_str(256);
            }
            5 => {
                let bits = usize::from(data[idx.saturating_sub(1)] % 65);
                let _ = reader.read_fixed_bitset(bits);
            }
            6 => {
                let _ = reader.read_f64();
            }
            _ => {
                let _ = reader.read_len(1024);
            }
        }
    }
});
