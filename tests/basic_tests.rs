use iwtrace::*;
use pretty_assertions::assert_eq;

fn read_escape(data: &[u8]) -> EscapeSequence {
    let mut reader = ByteReader::new(data);
    let mut raster = RasterBuffer::new();
    EscapeSequence::read(&mut reader, &mut raster).expect("escape sequence should decode")
}

#[test]
fn test_fixed_number_decimal_values() {
    for (digits, expected) in [("0", 0), ("7", 7), ("007", 7), ("120", 120), ("9999", 9999)] {
        let mut reader = ByteReader::new(digits.as_bytes());
        assert_eq!(reader.fixed_number(digits.len()).unwrap(), expected, "{digits}");
    }
}

#[test]
fn test_number_list() {
    let mut reader = ByteReader::new(&b"001,002,003."[..]);
    assert_eq!(reader.number_list(3).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_number_list_rejects_other_separators() {
    let mut reader = ByteReader::new(&b"5?"[..]);
    let err = reader.number_list(1).unwrap_err();
    assert!(matches!(err, TraceError::BadListSeparator { byte: b'?', offset: 1 }));
    assert_eq!(err.to_string(), "bad list separator 0x3f at offset 1");
}

#[test]
fn test_pattern_sixel() {
    let pattern = Pattern {
        key: b'a',
        top: true,
        data: vec![0x3f],
    };
    assert_eq!(pattern_to_sixel(&pattern), "\x1bPq~-?\x1b\\");
}

#[test]
fn test_empty_raster_sixel() {
    assert_eq!(RasterBuffer::new().to_sixel(), "\x1bPq\x1b\\");
}

#[test]
fn test_blank_strip_sixel() {
    let lines = vec![vec![0u8]; 6];
    assert_eq!(raster_to_sixel(&lines), "\x1bPq?-?-?-?-?-?-?-?-\x1b\\");
}

#[test]
fn test_blank_raster_is_all_question_marks() {
    let lines = vec![vec![0u8; 5]; 13];
    let sixel = raster_to_sixel(&lines);
    let body = &sixel[3..sixel.len() - 2];
    // 13 lines pad to 3 strips of 8 bands
    assert_eq!(body.matches('-').count(), 24);
    assert!(body.split('-').filter(|b| !b.is_empty()).all(|b| b == "?????"));
}

#[test]
fn test_reset_defaults() {
    assert_eq!(read_escape(b"c").to_string(), "<Escape c:\"Reset defaults\">");
}

#[test]
fn test_print_quality() {
    let seq = read_escape(b"a2");
    assert_eq!(seq.command, Command::PrintQuality(2));
    assert_eq!(seq.to_string(), "<Escape a:\"Print quality 2\">");
}

#[test]
fn test_every_pitch() {
    for (id, label) in [
        (b'n', "9 cpi"),
        (b'N', "10 cpi"),
        (b'E', "12 cpi"),
        (b'e', "13.4 cpi"),
        (b'q', "15 cpi"),
        (b'Q', "17 cpi"),
        (b'p', "144 dpi"),
        (b'P', "160 dpi"),
    ] {
        let seq = read_escape(&[id]);
        assert_eq!(
            seq.to_string(),
            format!("<Escape {}:\"Pitch {}\">", id as char, label)
        );
    }
}

#[test]
fn test_graphic_commands_fill_raster() {
    let mut reader = ByteReader::new(&b"S0002\x0f\xf0V0003\x81g001\x01\x02\x03\x04\x05\x06\x07\x08"[..]);
    let mut raster = RasterBuffer::new();
    for _ in 0..3 {
        let seq = EscapeSequence::read(&mut reader, &mut raster).unwrap();
        assert!(seq.command.raster_line().is_some());
    }
    assert_eq!(
        raster.lines(),
        &[
            vec![0x0f, 0xf0],
            vec![0x81, 0x81, 0x81],
            vec![1, 2, 3, 4, 5, 6, 7, 8],
        ]
    );
}

#[test]
fn test_patterns_stay_out_of_raster() {
    let mut reader = ByteReader::new(&b"IAA\x01Bb\x01\x02\x04"[..]);
    let mut raster = RasterBuffer::new();
    let seq = EscapeSequence::read(&mut reader, &mut raster).unwrap();
    match seq.command {
        Command::LoadCharacters(patterns) => {
            assert_eq!(
                patterns,
                vec![
                    Pattern {
                        key: b'A',
                        top: true,
                        data: vec![0x01],
                    },
                    Pattern {
                        key: b'B',
                        top: false,
                        data: vec![0x01, 0x02],
                    },
                ]
            );
        }
        other => panic!("expected LoadCharacters, got {:?}", other),
    }
    assert!(raster.is_empty());
}
