//! Cross-checks against independent implementations: the writer's output
//! must be JSON that `serde_json` accepts, and the encoder's output must
//! be CBOR that `ciborium` accepts.

use std::io::Cursor;

use ciborium::value::Value as CborValue;
use wireprobe_buffers::Writer;
use wireprobe_codec::{
    parse_binary, parse_json, JsonToBinaryEncoder, JsonWriter, Status, SystemPlatform,
};

fn json_to_binary(json: &str) -> Vec<u8> {
    let mut wire = Writer::new();
    let mut status = Status::ok();
    let mut encoder = JsonToBinaryEncoder::new(&mut wire, &mut status);
    parse_json(&SystemPlatform, json.as_bytes(), &mut encoder);
    assert!(status.is_ok(), "encode failed for {json}: {status:?}");
    wire.flush()
}

fn binary_to_json(bytes: &[u8]) -> String {
    let mut text = String::new();
    let mut status = Status::ok();
    let mut writer = JsonWriter::new(&SystemPlatform, &mut text, &mut status);
    parse_binary(bytes, &mut writer);
    assert!(status.is_ok(), "decode failed: {status:?}");
    text
}

fn decode_cbor(bytes: &[u8]) -> CborValue {
    let mut cursor = Cursor::new(bytes);
    ciborium::de::from_reader(&mut cursor).expect("ciborium accepts the encoder output")
}

#[test]
fn writer_output_is_json_serde_accepts() {
    let corpus = [
        r#"{"a":1,"b":[true,null,"x"],"c":{"d":3.1415}}"#,
        r#"{"msg":"Hello, 🌎.","esc":"\"\\\n\t"}"#,
        r#"{"ints":[0,-1,2147483647,-2147483648],"wide":[2147483648,-2.5]}"#,
        r#"{"empty":{},"none":[]}"#,
    ];
    for json in corpus {
        let round_tripped = binary_to_json(&json_to_binary(json));
        let ours: serde_json::Value =
            serde_json::from_str(&round_tripped).expect("writer output parses");
        let reference: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(ours, reference, "for {json}");
    }
}

#[test]
fn ascii_documents_decode_with_ciborium() {
    let bytes = json_to_binary(r#"{"a":[1,2,3],"b":true,"nil":null}"#);
    let value = decode_cbor(&bytes);
    let expected = CborValue::Map(vec![
        (
            CborValue::Text("a".into()),
            CborValue::Array(vec![
                CborValue::Integer(1.into()),
                CborValue::Integer(2.into()),
                CborValue::Integer(3.into()),
            ]),
        ),
        (CborValue::Text("b".into()), CborValue::Bool(true)),
        (CborValue::Text("nil".into()), CborValue::Null),
    ]);
    assert_eq!(value, expected);
}

#[test]
fn negative_integers_and_doubles_decode_with_ciborium() {
    let bytes = json_to_binary(r#"{"n":-5,"d":3.5}"#);
    let value = decode_cbor(&bytes);
    let expected = CborValue::Map(vec![
        (CborValue::Text("n".into()), CborValue::Integer((-5).into())),
        (CborValue::Text("d".into()), CborValue::Float(3.5)),
    ]);
    assert_eq!(value, expected);
}

#[test]
fn wide_strings_ride_in_byte_strings() {
    // A non-ASCII value is carried as a UTF-16LE byte string, which plain
    // CBOR sees as raw bytes.
    let bytes = json_to_binary(r#"{"s":"é"}"#);
    let value = decode_cbor(&bytes);
    let expected = CborValue::Map(vec![(
        CborValue::Text("s".into()),
        CborValue::Bytes(vec![0xe9, 0x00]),
    )]);
    assert_eq!(value, expected);
}
