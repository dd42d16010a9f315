//! tests/vector_tests.rs
//! Known-answer session streams, checked in both directions
//!
//! The JSON vectors were produced by an independent AES-256-CTR / HMAC-SHA256
//! implementation, so a shared bug in encoder and decoder cannot hide here.

use hermes_rs::aliases::Iv16;
use hermes_rs::{DecoderBuilder, SessionKeys, StreamEncoder};
use serde::Deserialize;
use std::io::Cursor;

mod common;
use common::{TEST_ENCRYPTION_KEY, TEST_SIGNATURE_KEY};

const VECTORS: &str = include_str!("vector/data/session_vectors.json");

#[derive(Debug, Deserialize)]
struct VectorFile {
    encryption_key_hex: String,
    signature_key_hex: String,
    vectors: Vec<SessionVector>,
}

#[derive(Debug, Deserialize)]
struct SessionVector {
    name: String,
    preamble_hex: String,
    initial_counter: u64,
    iv_fragment_hex: String,
    session_iv_hex: String,
    reserved_hex: String,
    packets_hex: Vec<String>,
    packet_counters: Vec<u64>,
    stream_hex: String,
}

fn load() -> (SessionKeys, Vec<SessionVector>) {
    let file: VectorFile = serde_json::from_str(VECTORS).expect("valid vector JSON");
    let encryption: [u8; 32] = hex::decode(&file.encryption_key_hex)
        .unwrap()
        .try_into()
        .unwrap();
    let signature: [u8; 16] = hex::decode(&file.signature_key_hex)
        .unwrap()
        .try_into()
        .unwrap();
    (SessionKeys::new(encryption, signature), file.vectors)
}

fn fixed<const N: usize>(hex_str: &str) -> [u8; N] {
    hex::decode(hex_str).unwrap().try_into().unwrap()
}

#[test]
fn vector_keys_match_shared_test_keys() {
    let (keys, vectors) = load();
    assert_eq!(keys.encryption().expose_secret(), &TEST_ENCRYPTION_KEY);
    assert_eq!(keys.signature().expose_secret(), &TEST_SIGNATURE_KEY);
    assert!(!vectors.is_empty());
}

#[test]
fn decoder_reproduces_vector_payloads() {
    let (keys, vectors) = load();
    for vector in vectors {
        let stream = hex::decode(&vector.stream_hex).unwrap();
        let mut decoder = DecoderBuilder::new(keys.clone()).build(Cursor::new(stream));

        let handshake = decoder.handshake().unwrap().expect(&vector.name);
        assert_eq!(
            handshake.session_iv().expose_secret(),
            &fixed::<16>(&vector.session_iv_hex),
            "{}: session IV",
            vector.name
        );
        assert_eq!(handshake.initial_counter(), vector.initial_counter, "{}", vector.name);
        assert_eq!(handshake.reserved(), fixed::<2>(&vector.reserved_hex), "{}", vector.name);

        let packets: Vec<_> = decoder.by_ref().map(Result::unwrap).collect();
        assert_eq!(packets.len(), vector.packets_hex.len(), "{}", vector.name);
        for ((packet, expected_hex), &counter) in packets
            .iter()
            .zip(&vector.packets_hex)
            .zip(&vector.packet_counters)
        {
            assert_eq!(
                hex::encode(packet.payload()),
                *expected_hex,
                "{}: packet {}",
                vector.name,
                packet.index()
            );
            assert_eq!(packet.counter(), counter, "{}: packet {}", vector.name, packet.index());
        }
    }
}

#[test]
fn encoder_reproduces_vector_streams() {
    let (keys, vectors) = load();
    for vector in vectors {
        let mut encoder = StreamEncoder::new(Vec::new(), keys.clone());
        encoder
            .write_preamble(&hex::decode(&vector.preamble_hex).unwrap())
            .unwrap();
        encoder
            .write_handshake(
                vector.initial_counter,
                fixed::<8>(&vector.iv_fragment_hex),
                &Iv16::new(fixed::<16>(&vector.session_iv_hex)),
                fixed::<2>(&vector.reserved_hex),
            )
            .unwrap();
        for packet_hex in &vector.packets_hex {
            encoder.write_packet(&hex::decode(packet_hex).unwrap()).unwrap();
        }
        let stream = encoder.into_inner().unwrap();

        assert_eq!(hex::encode(&stream), vector.stream_hex, "{}", vector.name);
    }
}
