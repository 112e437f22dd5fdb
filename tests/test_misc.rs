use qoi_codec::{decode_file, decode_header, encode_to_vec, Channels, ColorSpace, Error, Header};

#[test]
fn test_new_decoder() {
    // this used to fail due to `Bytes` not being `pub`
    let arr = [0u8];
    let _ = qoi_codec::Decoder::new(&arr[..]);
}

#[test]
fn test_new_encoder() {
    let arr3 = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]; // 2 * 2 * 3
    let arr4 = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]; // 2 * 2 * 4

    let enc = qoi_codec::Encoder::new(&arr3, 2, 2).unwrap();
    assert_eq!(enc.channels(), Channels::Rgb);

    let enc = qoi_codec::Encoder::new(&arr4, 2, 2).unwrap();
    assert_eq!(enc.channels(), Channels::Rgba);

    assert!(matches!(qoi_codec::Encoder::new(&arr3, 3, 3), Err(Error::InvalidArgument { .. })));
    assert!(matches!(qoi_codec::Encoder::new(&arr3, 1, 1), Err(Error::InvalidArgument { .. })));
}

// Scenario 1 (§8): minimum header rejection.
#[test]
fn rejects_input_shorter_than_header() {
    let bytes = [0_u8; 13];
    assert_eq!(decode_header(bytes), Err(Error::TruncatedHeader { len: 13 }));
    assert_eq!(decode_file(bytes), Err(Error::TruncatedHeader { len: 13 }));
}

// Scenario 2 (§8): wrong magic.
#[test]
fn rejects_wrong_magic() {
    let mut bytes = [0_u8; 14];
    bytes[0..4].copy_from_slice(b"xxxx");
    bytes[12] = 3;
    bytes[13] = 0;
    assert_eq!(decode_header(bytes), Err(Error::BadMagic { found: *b"xxxx" }));
}

// Scenario 3 (§8): solid-color 100x100 RGB image encodes to a single
// leading opcode plus a run of run opcodes. Note: against prev=(0,0,0,255),
// (0,0,253) has dg=0, db-dg=-3, both within LUMA's range, so rule 5 (Luma)
// fires before rule 6 (RGB) per the ordered list in §4.3 - the two-byte
// LUMA opcode `A0 85`, not the four-byte RGB opcode the worked example's
// prose names, is what the specified decision procedure actually produces
// (see DESIGN.md for this discrepancy between §4.3 and §8's worked bytes).
#[test]
fn solid_color_image_encodes_to_one_leading_opcode_plus_runs() {
    let pixels = vec![0_u8, 0, 253].repeat(100 * 100);
    let qoi = encode_to_vec(&pixels, 100, 100).unwrap();

    assert_eq!(&qoi[0..14], &[b'q', b'o', b'i', b'f', 0, 0, 0, 0x64, 0, 0, 0, 0x64, 3, 0]);
    assert_eq!(&qoi[14..16], &[0xa0, 0x85]); // LUMA(dg=0, dr-dg=0, db-dg=-3)

    // 9999 remaining pixels = 161 full RUN(61) opcodes + one RUN(16) tail.
    let run_start = 16;
    for i in 0..161 {
        assert_eq!(qoi[run_start + i], 0xfd, "run opcode #{i} should be RUN(61)");
    }
    assert_eq!(qoi[run_start + 161], 0xd0); // RUN(16)

    let end_marker_start = run_start + 162;
    assert_eq!(&qoi[end_marker_start..end_marker_start + 8], &[0, 0, 0, 0, 0, 0, 0, 1]);
    assert_eq!(qoi.len(), end_marker_start + 8);

    let (header, decoded) = decode_file(&qoi).unwrap();
    assert_eq!(header, Header { width: 100, height: 100, channels: Channels::Rgb, colorspace: ColorSpace::Srgb });
    assert_eq!(decoded, pixels);
}

// Scenario 4 (§8): single-pixel round trip, channels=4.
#[test]
fn single_pixel_rgba_round_trips_as_rgb_opcode() {
    let pixels = [17_u8, 34, 51, 255];
    let qoi = encode_to_vec(pixels, 1, 1).unwrap();
    assert_eq!(&qoi[14..18], &[0xfe, 17, 34, 51]);
    assert_eq!(&qoi[18..26], &[0, 0, 0, 0, 0, 0, 0, 1]);

    let (header, decoded) = decode_file(&qoi).unwrap();
    assert_eq!(header.channels, Channels::Rgba);
    assert_eq!(decoded, pixels);
}

// Property (§8, "Round-trip law"): encode/decode is the identity on pixel
// buffers, for both channel counts, across a range of random small images.
#[test]
fn round_trip_is_identity_for_random_images() {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let width = rng.gen_range(1..=16);
        let height = rng.gen_range(1..=16);
        for channels in [Channels::Rgb, Channels::Rgba] {
            let n = width as usize * height as usize * channels.as_u8() as usize;
            let pixels: Vec<u8> = (0..n).map(|_| rng.gen()).collect();
            let qoi = encode_to_vec(&pixels, width, height).unwrap();
            let (header, decoded) = decode_file(&qoi).unwrap();
            assert_eq!(header.channels, channels);
            assert_eq!(decoded, pixels);
        }
    }
}

// Property (§8, "Bounds safety"): every strict prefix of a valid encoded
// stream either decodes correctly (impossible here, since we always cut
// before the end marker) or fails cleanly - it never panics and never
// returns a partial image.
#[test]
fn truncated_prefixes_never_panic_and_never_return_partial_output() {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let width = 12;
    let height = 9;
    let n = width as usize * height as usize * 4;
    let pixels: Vec<u8> = (0..n).map(|_| rng.gen()).collect();
    let qoi = encode_to_vec(&pixels, width, height).unwrap();

    for cut in 14..qoi.len() {
        let prefix = &qoi[..cut];
        match decode_file(prefix) {
            Ok((_, out)) => assert_eq!(out.len(), n),
            Err(Error::TruncatedStream { .. } | Error::UnexpectedEof { .. } | Error::RunOverflow { .. }) => {}
            Err(other) => panic!("unexpected error kind for truncated input: {other:?}"),
        }
    }
}

// Property (§8, "Malformed robustness"): arbitrary bytes following a
// well-formed header never panic, never loop forever, and never allocate
// more than `width * height * channels` output bytes.
#[test]
fn arbitrary_opcode_bytes_never_panic() {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let header = Header::try_new(4, 4, Channels::Rgba, ColorSpace::Srgb).unwrap();
    for _ in 0..200 {
        let mut file = header.encode().to_vec();
        let garbage_len = rng.gen_range(0..40);
        file.extend((0..garbage_len).map(|_| rng.gen::<u8>()));
        let _ = decode_file(&file); // must not panic, regardless of outcome
    }
}
