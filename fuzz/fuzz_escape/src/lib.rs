use squirrel_encode::{escape::Backend, float::shortest_decimal, format_double, Search};

/**
Search the input with every available backend, and make sure they all agree.
*/
pub fn escape(input: &[u8]) {
    let fallback = search(input, Backend::Fallback);

    for backend in [Backend::Sse2, Backend::Neon] {
        if backend.is_available() {
            assert_eq!(fallback, search(input, backend), "backend {:?}", backend);
        }
    }

    // the reported bytes are copied through verbatim, so the output is the input
    assert_eq!(input, &fallback.1[..]);

    // If the input is a string then the escaped form should match serde_json's
    if let Ok(input) = std::str::from_utf8(input) {
        let escaped = squirrel_encode::escape_json(input);
        let expected = serde_json::to_string(input).expect("failed to serialize string");

        assert_eq!(expected, format!("\"{}\"", escaped));
    }
}

fn search(input: &[u8], backend: Backend) -> (Vec<usize>, Vec<u8>) {
    let mut offsets = Vec::new();
    let mut search = Search::with_backend(input, Vec::new(), backend);

    while search.next_escape().expect("infallible sink") {
        offsets.push(search.position());

        let curr = search.current();
        search.escape_current(&[curr]).expect("infallible sink");
    }

    assert!(search.is_finished());

    (offsets, search.into_sink())
}

/**
Format each 8 byte window of the input as a double, and make sure it round-trips.
*/
pub fn float(input: &[u8]) {
    for window in input.chunks_exact(8) {
        let mut bits = [0; 8];
        bits.copy_from_slice(window);

        let value = f64::from_le_bytes(bits);
        let formatted = format_double(value);

        if value.is_nan() {
            assert_eq!("NaN", formatted);
            continue;
        }

        let parsed: f64 = formatted.parse().expect("failed to parse double");
        assert_eq!(value.to_bits(), parsed.to_bits(), "{:?}", formatted);

        let decimal = shortest_decimal(value).expect("finite double");
        assert!(decimal.digits().len() <= 17);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{fs, io::Read};

    fn run(input: &[u8]) {
        escape(input);
        float(input);
    }

    #[test]
    fn inputs() {
        if let Ok(inputs) = fs::read_dir("../in") {
            for input in inputs {
                let input = input.expect("invalid file").path();

                println!("input: {:?}", input);

                let mut f = fs::File::open(input).expect("failed to open");
                let mut input = Vec::new();
                f.read_to_end(&mut input).expect("failed to read file");

                run(&input);
            }
        }
    }

    #[test]
    fn crashes() {
        if let Ok(crashes) = fs::read_dir("../../target/fuzz_escape/crashes") {
            for crash in crashes {
                let crash = crash.expect("invalid file").path();

                println!("repro: {:?}", crash);

                let mut f = fs::File::open(crash).expect("failed to open");
                let mut crash = Vec::new();
                f.read_to_end(&mut crash).expect("failed to read file");

                run(&crash);
            }
        }
    }

    #[test]
    fn seeds() {
        run(b"");
        run(b"a\"b\\c");
        run(b"\x00\x01\x1f plain text that's longer than a chunk \"\\\x7f\xff");
        run(&f64::MAX.to_le_bytes());
        run(&f64::NAN.to_le_bytes());
    }
}
