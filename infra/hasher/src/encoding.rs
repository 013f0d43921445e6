//! Serde helpers for transparently serializing byte buffers to Base64 strings.
//!
//! Both helpers use the standard alphabet without padding. Decoding errors surface as
//! regular serde errors so that a malformed snapshot fails at parse time.

/// `#[serde(with = "bytes_as_base64")]` for `Vec<u8>` fields.
pub mod bytes_as_base64 {
    use base64::{Engine as _, engine::general_purpose};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use zeroize::Zeroizing;

    /// Serializes a byte slice into a Base64 string without padding.
    pub fn serialize<S: Serializer>(v: &[u8], s: S) -> Result<S::Ok, S::Error> {
        let mut buf = Zeroizing::new(String::with_capacity((v.len() * 4).div_ceil(3)));
        general_purpose::STANDARD_NO_PAD.encode_string(v, &mut buf);
        String::serialize(&buf, s)
    }

    /// Deserializes a Base64 string back into a byte vector.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let raw = Zeroizing::new(String::deserialize(d)?);
        general_purpose::STANDARD_NO_PAD
            .decode(raw.trim_end_matches('='))
            .map_err(|e| serde::de::Error::custom(format!("Invalid Base64: {e}")))
    }
}

/// `#[serde(with = "option_bytes_as_base64")]` for `Option<Vec<u8>>` fields (`null` when absent).
pub mod option_bytes_as_base64 {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(v: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(bytes) => super::bytes_as_base64::serialize(bytes, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super::bytes_as_base64")] Vec<u8>);

        Ok(Option::<Wrapped>::deserialize(d)?.map(|Wrapped(bytes)| bytes))
    }
}
