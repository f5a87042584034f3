use chandl_common::{
    serde::{self, Deserialize, Serialize},
    serde_json::{self, Map, Value},
};

/// A post exactly as the thread API delivered it.
pub type RawPost = Map<String, Value>;

#[derive(Serialize, Deserialize, Debug)]
#[serde(crate = "self::serde")]
pub struct Thread {
    pub posts: Vec<RawPost>,
}

/// The fields of a thread post the extractor actually reads.
///
/// Posts carry many more fields (`resto`, `sticky`, `w`, `h`, `tn_w`, ...). Those stay in the
/// [`RawPost`] and travel untouched as the content's `extra` payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "self::serde")]
pub struct Post {
    pub no: u64,
    pub tim: Option<u64>,
    pub ext: Option<String>,
    pub filename: Option<String>,
    pub fsize: Option<u64>,
    pub md5: Option<String>,
    pub com: Option<String>,
    pub name: Option<String>,
    pub time: Option<i64>,
}

impl Post {
    pub fn from_raw(raw: &RawPost) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(raw.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chandl_common::serde_json::json;

    fn raw(value: Value) -> RawPost {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn parses_attachment_post() {
        let post = Post::from_raw(&raw(json!({
            "no": 570368,
            "resto": 0,
            "time": 1546293948,
            "name": "Anonymous",
            "com": "Hello",
            "filename": "cat",
            "ext": ".png",
            "w": 1024,
            "h": 768,
            "tim": 1546293948883u64,
            "fsize": 299198,
            "md5": "AAAAAAAAAAAAAAAAAAAAAA=="
        })))
        .unwrap();

        assert_eq!(post.no, 570368);
        assert_eq!(post.tim, Some(1546293948883));
        assert_eq!(post.ext.as_deref(), Some(".png"));
        assert_eq!(post.fsize, Some(299198));
        assert_eq!(post.filename.as_deref(), Some("cat"));
    }

    #[test]
    fn parses_text_post() {
        let post = Post::from_raw(&raw(json!({"no": 2, "com": "no file"}))).unwrap();
        assert_eq!(post.filename, None);
        assert_eq!(post.ext, None);
        assert_eq!(post.tim, None);
        assert_eq!(post.time, None);
    }

    #[test]
    fn post_number_is_required() {
        assert!(Post::from_raw(&raw(json!({"com": "orphan"}))).is_err());
    }
}
