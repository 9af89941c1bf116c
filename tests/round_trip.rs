//! Integration tests: encode frames with the writers, then recover them
//! through the scanner and extractors the way a transport would: walking
//! concatenated frames, surviving truncation at every byte boundary, and
//! carrying header-block state across split reads.

use protocol_hq::{
    parse_cancel_push_frame, parse_data_frame, parse_frames, parse_goaway_frame,
    parse_headers_frame, parse_max_push_id_frame, parse_priority_frame, parse_push_promise_frame,
    parse_settings_frame, write_cancel_push_frame, write_data_frame, write_frame_header,
    write_goaway_frame, write_headers_frame, write_max_push_id_frame, write_priority_frame,
    write_push_promise_frame, write_settings_frame, FrameType, Header, HeaderBlock,
    HeaderCompression, HeaderContext, ParseError, Priority, Settings, StaticTableEngine,
    PRIORITY_FLAG_EXCLUSIVE, PRIORITY_FLAG_PUSH_PRIORITY,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn compress(headers: &[Header]) -> Vec<u8> {
    let mut block = Vec::new();
    StaticTableEngine::new()
        .compress(headers, &mut block)
        .unwrap();
    block
}

fn request_headers() -> Vec<Header> {
    vec![
        Header::new(b":method", b"GET"),
        Header::new(b":scheme", b"https"),
        Header::new(b":authority", b"example.com"),
        Header::new(b":path", b"/res/main.css"),
        Header::new(b"user-agent", b"hq-test/0.1"),
    ]
}

// ── Frame walking ────────────────────────────────────────────────────

#[test]
fn walk_concatenated_frames() {
    // One buffer holding every frame kind plus an unknown one, walked by
    // re-invoking the scanner at successive offsets. The recovered
    // (type, span) sequence must consume the buffer with no residue.
    let mut buf = Vec::new();
    let mut expected = Vec::new();

    let start = buf.len();
    write_data_frame(&mut buf, b"body");
    expected.push((FrameType::Data, buf.len() - start));

    let start = buf.len();
    write_headers_frame(&mut buf, &compress(&request_headers()));
    expected.push((FrameType::Headers, buf.len() - start));

    let start = buf.len();
    write_priority_frame(
        &mut buf,
        &Priority {
            flags: PRIORITY_FLAG_PUSH_PRIORITY,
            request_id: 8,
            dependency_id: 4,
            weight: 127,
        },
    );
    expected.push((FrameType::Priority, buf.len() - start));

    let start = buf.len();
    write_cancel_push_frame(&mut buf, 5);
    expected.push((FrameType::CancelPush, buf.len() - start));

    let start = buf.len();
    write_settings_frame(
        &mut buf,
        &Settings {
            header_table_size: 512,
            max_header_list_size: 16384,
        },
    );
    expected.push((FrameType::Settings, buf.len() - start));

    let start = buf.len();
    write_push_promise_frame(&mut buf, 2, &compress(&request_headers()));
    expected.push((FrameType::PushPromise, buf.len() - start));

    let start = buf.len();
    write_frame_header(&mut buf, 0x2a, 4);
    buf.extend_from_slice(b"skip");
    expected.push((FrameType::Unknown(0x2a), buf.len() - start));

    let start = buf.len();
    write_goaway_frame(&mut buf, 12);
    expected.push((FrameType::GoAway, buf.len() - start));

    let start = buf.len();
    write_max_push_id_frame(&mut buf, 99);
    expected.push((FrameType::MaxPushId, buf.len() - start));

    let mut offset = 0;
    let mut walked = Vec::new();
    while offset < buf.len() {
        let (frame_type, span) = parse_frames(&buf[offset..]).unwrap();
        walked.push((frame_type, span));
        offset += span;
    }
    assert_eq!(offset, buf.len());
    assert_eq!(walked, expected);
}

#[test]
fn every_truncation_reports_incomplete() {
    // Chop a valid multi-frame buffer at every byte boundary: the scanner
    // must report need-more-data at the final partial frame, never panic
    // and never claim a frame it does not have.
    let mut buf = Vec::new();
    write_settings_frame(
        &mut buf,
        &Settings {
            header_table_size: 65536,
            max_header_list_size: 100,
        },
    );
    write_push_promise_frame(&mut buf, 77, &compress(&request_headers()));
    write_data_frame(&mut buf, b"tail bytes");

    for end in 0..buf.len() {
        let mut offset = 0;
        loop {
            match parse_frames(&buf[offset..end]) {
                Ok((_, span)) => {
                    assert!(span > 0);
                    offset += span;
                }
                Err(e) => {
                    assert_eq!(e, ParseError::Incomplete, "prefix of {end} bytes");
                    break;
                }
            }
            if offset == end {
                break;
            }
        }
    }
}

#[test]
fn extractors_reject_truncated_frames() {
    let mut buf = Vec::new();
    write_goaway_frame(&mut buf, 1_000_000);
    for end in 0..buf.len() {
        assert_eq!(
            parse_goaway_frame(&buf[..end]),
            Err(ParseError::Incomplete)
        );
    }

    let mut buf = Vec::new();
    write_priority_frame(
        &mut buf,
        &Priority {
            flags: 0,
            request_id: 70000,
            dependency_id: 3,
            weight: 16,
        },
    );
    for end in 0..buf.len() {
        assert_eq!(
            parse_priority_frame(&buf[..end]),
            Err(ParseError::Incomplete)
        );
    }
}

// ── Zero-copy DATA ───────────────────────────────────────────────────

#[test]
fn data_view_references_input_buffer() {
    let payload = b"zero copy payload";
    let mut buf = Vec::new();
    write_data_frame(&mut buf, payload);

    let data = parse_data_frame(&buf).unwrap();
    assert_eq!(data.payload, payload);
    assert_eq!(data.remaining, 0);

    // The view must be the exact sub-range of the frame buffer, not a copy.
    let buf_range = buf.as_ptr() as usize..buf.as_ptr() as usize + buf.len();
    let view_start = data.payload.as_ptr() as usize;
    assert!(buf_range.contains(&view_start));
    assert_eq!(view_start + data.payload.len(), buf_range.end);
}

#[test]
fn data_split_across_reads() {
    let mut buf = Vec::new();
    write_data_frame(&mut buf, b"0123456789");
    let cut = buf.len() - 6;

    let data = parse_data_frame(&buf[..cut]).unwrap();
    assert_eq!(data.payload, b"0123");
    assert_eq!(data.remaining, 6);

    // Once the rest arrives the same call sees the whole body.
    let data = parse_data_frame(&buf).unwrap();
    assert_eq!(data.payload, b"0123456789");
    assert_eq!(data.remaining, 0);
}

// ── Settings ─────────────────────────────────────────────────────────

#[test]
fn settings_duplicate_identifier_is_malformed() {
    // Identifier 0x01 sent twice (10 then 20) must fail as malformed and
    // populate nothing.
    let mut payload = Vec::new();
    protocol_hq::encode_varint(&mut payload, 0x01);
    protocol_hq::encode_varint(&mut payload, 10);
    protocol_hq::encode_varint(&mut payload, 0x01);
    protocol_hq::encode_varint(&mut payload, 20);
    let mut buf = Vec::new();
    write_frame_header(&mut buf, protocol_hq::FRAME_SETTINGS, payload.len() as u64);
    buf.extend_from_slice(&payload);

    assert_eq!(
        parse_settings_frame(&buf),
        Err(ParseError::MalformedFrame("duplicate settings identifier"))
    );
}

#[test]
fn settings_round_trip_through_frame() {
    let settings = Settings {
        header_table_size: 0,
        max_header_list_size: 1 << 20,
    };
    let mut buf = Vec::new();
    write_settings_frame(&mut buf, &settings);
    assert_eq!(parse_settings_frame(&buf).unwrap(), settings);
}

// ── Header blocks across frames and reads ────────────────────────────

#[test]
fn split_header_block_equals_one_shot() {
    let headers = request_headers();
    let block = compress(&headers);
    let mut frame = Vec::new();
    write_headers_frame(&mut frame, &block);

    // One-shot decode.
    let mut ctx = HeaderContext::new(StaticTableEngine::new());
    let one_shot = match parse_headers_frame(&mut ctx, &frame).unwrap() {
        HeaderBlock::Complete(h) => h,
        other => panic!("expected complete block, got {other:?}"),
    };

    // Split decode: prefix then remainder through a fresh context.
    let split = frame.len() / 2;
    let mut ctx = HeaderContext::new(StaticTableEngine::new());
    match parse_headers_frame(&mut ctx, &frame[..split]).unwrap() {
        HeaderBlock::Partial(owed) => assert_eq!(owed, frame.len() - split),
        other => panic!("expected partial block, got {other:?}"),
    }
    let split_decode = match parse_headers_frame(&mut ctx, &frame[split..]).unwrap() {
        HeaderBlock::Complete(h) => h,
        other => panic!("expected complete block, got {other:?}"),
    };

    assert_eq!(one_shot, split_decode);
    assert_eq!(one_shot, headers);
}

#[test]
fn header_blocks_share_one_context_in_order() {
    // Two HEADERS frames on one stream must go through the same context
    // sequentially and keep their own field lists.
    let first = vec![Header::new(b":status", b"200")];
    let second = vec![Header::new(b":status", b"404"), Header::new(b"etag", b"x1")];

    let mut buf = Vec::new();
    write_headers_frame(&mut buf, &compress(&first));
    let first_span = parse_frames(&buf).unwrap().1;
    write_headers_frame(&mut buf, &compress(&second));

    let mut ctx = HeaderContext::new(StaticTableEngine::new());
    match parse_headers_frame(&mut ctx, &buf).unwrap() {
        HeaderBlock::Complete(h) => assert_eq!(h, first),
        other => panic!("got {other:?}"),
    }
    match parse_headers_frame(&mut ctx, &buf[first_span..]).unwrap() {
        HeaderBlock::Complete(h) => assert_eq!(h, second),
        other => panic!("got {other:?}"),
    }
}

#[test]
fn push_promise_carries_push_id_and_headers() {
    let headers = request_headers();
    let mut buf = Vec::new();
    write_push_promise_frame(&mut buf, 11, &compress(&headers));

    let mut ctx = HeaderContext::new(StaticTableEngine::new());
    let (push_id, block) = parse_push_promise_frame(&mut ctx, &buf).unwrap();
    assert_eq!(push_id, 11);
    assert_eq!(block, HeaderBlock::Complete(headers));
}

#[test]
fn compression_failure_is_fatal_to_the_stream() {
    // A block referencing the dynamic table is rejected by the static
    // engine; afterwards the same context must refuse further blocks.
    let mut buf = Vec::new();
    write_headers_frame(&mut buf, &[0x04, 0x00, 0xc2]);

    let mut ctx = HeaderContext::new(StaticTableEngine::new());
    assert!(matches!(
        parse_headers_frame(&mut ctx, &buf),
        Err(ParseError::HeaderCompression(_))
    ));
    assert!(ctx.is_poisoned());

    let mut good = Vec::new();
    write_headers_frame(&mut good, &compress(&request_headers()));
    assert!(matches!(
        parse_headers_frame(&mut ctx, &good),
        Err(ParseError::HeaderCompression(_))
    ));
}

// ── Unknown frames ───────────────────────────────────────────────────

#[test]
fn unknown_frame_skippable_by_span() {
    let mut buf = Vec::new();
    write_frame_header(&mut buf, 0x1f40, 9);
    buf.extend_from_slice(b"opaque!!!");
    write_max_push_id_frame(&mut buf, 7);

    let (frame_type, span) = parse_frames(&buf).unwrap();
    assert_eq!(frame_type, FrameType::Unknown(0x1f40));

    // Skipping the reported span lands exactly on the next frame.
    assert_eq!(parse_max_push_id_frame(&buf[span..]).unwrap(), 7);
}

// ── Id frames ────────────────────────────────────────────────────────

#[test]
fn goaway_and_max_push_id_values() {
    let mut buf = Vec::new();
    write_goaway_frame(&mut buf, 42);
    assert_eq!(parse_goaway_frame(&buf).unwrap(), 42);

    let mut buf = Vec::new();
    write_max_push_id_frame(&mut buf, 7);
    assert_eq!(parse_max_push_id_frame(&buf).unwrap(), 7);

    let mut buf = Vec::new();
    write_cancel_push_frame(&mut buf, 1234);
    assert_eq!(parse_cancel_push_frame(&buf).unwrap(), 1234);
}

#[test]
fn priority_fields_preserved() {
    let priority = Priority {
        flags: PRIORITY_FLAG_EXCLUSIVE,
        request_id: 1 << 40,
        dependency_id: 63,
        weight: 0,
    };
    let mut buf = Vec::new();
    write_priority_frame(&mut buf, &priority);
    assert_eq!(parse_priority_frame(&buf).unwrap(), priority);
}
