//! 表層形から単語IDへの索引
//!
//! このモジュールは、表層形の完全一致検索で単語IDを引くための索引を
//! 提供します。キー検索はダブル配列トライで行い、同綴りの語（同形異義）
//! が複数のレコードを指す場合はポスティングリストでIDの列を取得します。
//!
//! 索引は2種類に分かれます。ちょうど1レコードに解決される表層形は
//! [`SingleFormIndex`]（値は単語IDそのもの）、2レコード以上に解決される
//! 表層形は[`MultiFormIndex`]（値はポスティングリストへのオフセット）に
//! 保存されます。この分割は格納密度のための最適化です。
//!
//! 各索引は、マジックバイト行とbincode本体からなる単一の不透明な
//! バイナリブロブとして直列化されます。

use std::collections::BTreeMap;
use std::io::{Read, Write};

use bincode::{
    de::{BorrowDecode, BorrowDecoder, Decoder},
    enc::Encoder,
    error::{DecodeError, EncodeError},
    Decode, Encode,
};

use crate::common::{bincode_config, INDEX_MAGIC};
use crate::errors::{MorfemaError, Result};
use crate::utils::FromU32;

/// ダブル配列トライ
///
/// crawdadクレートの`Trie`をラップし、空のキー集合も表現できるように
/// します（`None`は空の索引で、すべての検索が不一致になります）。
struct Trie {
    da: Option<crawdad::Trie>,
}

impl Trie {
    /// ソート済みのレコードからトライを構築します。
    fn from_records<K>(records: &[(K, u32)]) -> Result<Self>
    where
        K: AsRef<str>,
    {
        if records.is_empty() {
            return Ok(Self { da: None });
        }
        Ok(Self {
            da: Some(
                crawdad::Trie::from_records(records.iter().map(|(k, v)| (k, *v)))
                    .map_err(|e| MorfemaError::invalid_argument("records", e.to_string()))?,
            ),
        })
    }

    /// キーに完全一致する値を返します。
    #[inline(always)]
    fn exact_match(&self, key: &str) -> Option<u32> {
        self.da.as_ref()?.exact_match(key.chars())
    }
}

impl Encode for Trie {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        Encode::encode(&self.da.as_ref().map(|da| da.serialize_to_vec()), encoder)?;
        Ok(())
    }
}

impl<Context> Decode<Context> for Trie {
    fn decode<D: Decoder>(decoder: &mut D) -> Result<Self, DecodeError> {
        let data: Option<Vec<u8>> = Decode::decode(decoder)?;
        Ok(Self {
            da: data.map(|d| crawdad::Trie::deserialize_from_slice(&d).0),
        })
    }
}

impl<'de, Context> BorrowDecode<'de, Context> for Trie {
    fn borrow_decode<D: BorrowDecoder<'de>>(decoder: &mut D) -> Result<Self, DecodeError> {
        let data: Option<Vec<u8>> = Decode::decode(decoder)?;
        Ok(Self {
            da: data.map(|d| crawdad::Trie::deserialize_from_slice(&d).0),
        })
    }
}

/// ポスティングリスト
///
/// IDの列を「長さ、値…」の繰り返しで1本の配列に詰めたものです。
#[derive(Default, Decode, Encode)]
struct Postings {
    data: Vec<u32>,
}

impl Postings {
    /// 指定されたオフセットのIDイテレータを取得します。
    #[inline(always)]
    fn ids(&'_ self, i: usize) -> impl Iterator<Item = u32> + '_ {
        let len = usize::from_u32(self.data[i]);
        self.data[i + 1..i + 1 + len].iter().cloned()
    }
}

/// ポスティングリストを構築するビルダー
#[derive(Default)]
struct PostingsBuilder {
    data: Vec<u32>,
}

impl PostingsBuilder {
    /// IDリストを追加し、そのオフセットを返します。
    fn push(&mut self, ids: &[u32]) -> Result<usize> {
        let offset = self.data.len();
        self.data.push(ids.len().try_into()?);
        self.data.extend_from_slice(ids);
        Ok(offset)
    }

    fn build(self) -> Postings {
        Postings { data: self.data }
    }
}

fn write_magic<W: Write>(wtr: &mut W) -> Result<()> {
    wtr.write_all(INDEX_MAGIC)?;
    Ok(())
}

fn check_magic<R: Read>(rdr: &mut R) -> Result<()> {
    let mut magic = [0; INDEX_MAGIC.len()];
    rdr.read_exact(&mut magic)?;
    if magic != INDEX_MAGIC {
        return Err(MorfemaError::invalid_argument(
            "rdr",
            "The magic number of the index file mismatches.",
        ));
    }
    Ok(())
}

/// ちょうど1レコードに解決される表層形の索引
///
/// トライの値が単語IDそのものです。
#[derive(Decode, Encode)]
pub struct SingleFormIndex {
    trie: Trie,
}

impl SingleFormIndex {
    /// 完全な表層形→単語IDの集合から索引を一括構築します。
    pub fn from_map(map: &BTreeMap<String, u32>) -> Result<Self> {
        let records: Vec<(&str, u32)> = map.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        Ok(Self {
            trie: Trie::from_records(&records)?,
        })
    }

    /// 表層形に対応する単語IDを返します。
    #[inline(always)]
    pub fn get(&self, form: &str) -> Option<u32> {
        self.trie.exact_match(form)
    }

    /// 索引を単一のバイナリブロブとして書き出します。
    pub fn write<W: Write>(&self, mut wtr: W) -> Result<()> {
        write_magic(&mut wtr)?;
        bincode::encode_into_std_write(self, &mut wtr, bincode_config())?;
        Ok(())
    }

    /// バイナリブロブから索引を読み込みます。
    ///
    /// # エラー
    ///
    /// マジックバイトが一致しない場合、またはデコードに失敗した場合に
    /// エラーを返します。
    pub fn read<R: Read>(mut rdr: R) -> Result<Self> {
        check_magic(&mut rdr)?;
        Ok(bincode::decode_from_std_read(&mut rdr, bincode_config())?)
    }
}

/// 2レコード以上に解決される表層形（同形異義語）の索引
///
/// トライの値はポスティングリストへのオフセットです。
#[derive(Decode, Encode)]
pub struct MultiFormIndex {
    trie: Trie,
    postings: Postings,
}

impl MultiFormIndex {
    /// 完全な表層形→単語ID列の集合から索引を一括構築します。
    pub fn from_map(map: &BTreeMap<String, Vec<u32>>) -> Result<Self> {
        let mut records = Vec::with_capacity(map.len());
        let mut builder = PostingsBuilder::default();
        for (form, ids) in map {
            let offset = builder.push(ids)?;
            records.push((form.as_str(), u32::try_from(offset)?));
        }
        Ok(Self {
            trie: Trie::from_records(&records)?,
            postings: builder.build(),
        })
    }

    /// 表層形に対応する単語IDの列を返します。
    #[inline(always)]
    pub fn get(&'_ self, form: &str) -> Option<impl Iterator<Item = u32> + '_> {
        let offset = self.trie.exact_match(form)?;
        Some(self.postings.ids(usize::from_u32(offset)))
    }

    /// 索引を単一のバイナリブロブとして書き出します。
    pub fn write<W: Write>(&self, mut wtr: W) -> Result<()> {
        write_magic(&mut wtr)?;
        bincode::encode_into_std_write(self, &mut wtr, bincode_config())?;
        Ok(())
    }

    /// バイナリブロブから索引を読み込みます。
    ///
    /// # エラー
    ///
    /// マジックバイトが一致しない場合、またはデコードに失敗した場合に
    /// エラーを返します。
    pub fn read<R: Read>(mut rdr: R) -> Result<Self> {
        check_magic(&mut rdr)?;
        Ok(bincode::decode_from_std_read(&mut rdr, bincode_config())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_index_lookup() {
        let mut map = BTreeMap::new();
        map.insert("красивый".to_string(), 1);
        map.insert("стол".to_string(), 2);
        let index = SingleFormIndex::from_map(&map).unwrap();
        assert_eq!(index.get("красивый"), Some(1));
        assert_eq!(index.get("стол"), Some(2));
        assert_eq!(index.get("красив"), None);
        assert_eq!(index.get("незнакомый"), None);
    }

    #[test]
    fn test_multi_index_lookup() {
        let mut map = BTreeMap::new();
        map.insert("стали".to_string(), vec![3, 7]);
        map.insert("душе".to_string(), vec![4, 5, 6]);
        let index = MultiFormIndex::from_map(&map).unwrap();
        let ids: Vec<u32> = index.get("стали").unwrap().collect();
        assert_eq!(ids, vec![3, 7]);
        let ids: Vec<u32> = index.get("душе").unwrap().collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert!(index.get("сталь").is_none());
    }

    #[test]
    fn test_empty_index() {
        let index = SingleFormIndex::from_map(&BTreeMap::new()).unwrap();
        assert_eq!(index.get("стол"), None);

        let index = MultiFormIndex::from_map(&BTreeMap::new()).unwrap();
        assert!(index.get("стол").is_none());
    }

    #[test]
    fn test_single_index_round_trip() {
        let mut map = BTreeMap::new();
        map.insert("ёж".to_string(), 9);
        let index = SingleFormIndex::from_map(&map).unwrap();

        let mut buffer = Vec::new();
        index.write(&mut buffer).unwrap();
        let loaded = SingleFormIndex::read(buffer.as_slice()).unwrap();
        assert_eq!(loaded.get("ёж"), Some(9));
        assert_eq!(loaded.get("еж"), None);
    }

    #[test]
    fn test_multi_index_round_trip() {
        let mut map = BTreeMap::new();
        map.insert("стали".to_string(), vec![1, 2]);
        let index = MultiFormIndex::from_map(&map).unwrap();

        let mut buffer = Vec::new();
        index.write(&mut buffer).unwrap();
        let loaded = MultiFormIndex::read(buffer.as_slice()).unwrap();
        let ids: Vec<u32> = loaded.get("стали").unwrap().collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_empty_index_round_trip() {
        let index = MultiFormIndex::from_map(&BTreeMap::new()).unwrap();
        let mut buffer = Vec::new();
        index.write(&mut buffer).unwrap();
        let loaded = MultiFormIndex::read(buffer.as_slice()).unwrap();
        assert!(loaded.get("стол").is_none());
    }

    #[test]
    fn test_read_rejects_bad_magic() {
        let result = SingleFormIndex::read(b"NotAnIndexFile 9.9\n\0\0\0\0".as_slice());
        assert!(result.is_err());
    }
}
