//! Static inputs shared across harnesses.

/// Envelope mixing both grammars, an unstructured message with a source
/// timestamp, and two hits that must be skipped.
pub const MIXED_ENVELOPE: &str = r#"{
  "rawResponse": {
    "hits": {
      "hits": [
        {
          "_id": "b-1",
          "_source": {
            "message": "3 | req-9 | tr-9 | sp-9 | /api/pay | pod-b | payments | ERROR | API | verifyPayment | {\"txn\":\"T-1\",\"amount\":12} at 2025-10-15 07:33:22.500",
            "pod_name": "pod-b"
          }
        },
        {
          "_id": "a-1",
          "_source": {
            "message": "41:|2025-10-15T07:33:22.500+05:30|dev-7|sess-7|checkout|/cart|cart-1|web|INFO|EVENT|addToCart:{\"sku\":\"X\"}",
            "pod_name": "pod-a",
            "timestamp": "2025-10-15T02:03:22.500Z"
          }
        },
        {
          "_id": "u-1",
          "_source": {
            "message": "plain text with no grammar",
            "timestamp": "2025-10-15T07:33:20.000Z"
          }
        },
        { "_id": "skip-no-message", "_source": { "timestamp": "2025-10-15T07:33:21.000Z" } },
        { "_id": "skip-no-timestamp", "_source": { "message": "nothing to date this by" } }
      ]
    }
  }
}"#;

/// Arbitrary document for the unstructured walk.
pub const NESTED_DOCUMENT: &str = r#"{
  "session": {
    "time": "2025-10-15T07:00:00Z",
    "events": [
      { "timestamp": "2025-10-15T07:00:02Z", "action": "checkout", "user": "alice" },
      { "timestamp": "2025-10-15T07:00:01Z", "event": "login", "user": "alice" },
      { "note": "no timestamp here" }
    ]
  }
}"#;
