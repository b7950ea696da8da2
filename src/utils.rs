use serde::{Deserialize, Serialize};

pub fn des_from_str<T: for<'a> Deserialize<'a>>(string: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(string)
}

pub fn ser_to_str<T: Serialize>(t: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(t)
}
