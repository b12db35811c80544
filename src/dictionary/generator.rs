//! 語幹・規則抽出器
//!
//! このモジュールは、1語分の生の語形変化表（コーパスの1ブロック）から
//! 共通語幹を探し、各語形を接頭辞・接尾辞・強勢・タググループの規則へ
//! 分解して、正規化されたパラダイムにパックします。
//!
//! 入力行は `語形|文法素列|強勢記号付き語形` の3フィールドです。
//! 強勢記号付き語形は0個以上のアポストロフィを含むことがあり、複数の
//! アポストロフィは強勢位置の曖昧さを表します。その場合、各候補位置
//! ごとに1つの規則が生成されます。

use hashbrown::HashSet;

use crate::dictionary::paradigm::{self, MorphRule};
use crate::dictionary::storage::Storage;
use crate::errors::Result;
use crate::utils;

/// 抽出結果のパラダイム
pub(crate) struct GeneratedParadigm {
    /// パックされたパラダイム
    pub paradigm: Vec<u16>,

    /// 共通語幹（空文字列も有効）
    pub stem: String,

    /// 別綴り（ё/е交替など）。規則にはならず、追加の索引キーとして
    /// 同じレコードを指します。
    pub alt_forms: HashSet<String>,
}

/// 1つの語形とその属性
struct ExtractedForm {
    word: String,
    grammemes: Vec<String>,
    stress: u16,
    alt: String,
}

/// 語形変化表のブロックからパラダイムを生成します。
///
/// # 引数
///
/// * `lines` - ブロックの生の行（小文字化済み）
/// * `storage` - 接辞とタググループのインターン先
///
/// # 戻り値
///
/// 生成されたパラダイム。ブロックから語形を1つも抽出できなかった場合は
/// `None`。
pub(crate) fn generate(
    lines: &[String],
    storage: &mut Storage,
) -> Result<Option<GeneratedParadigm>> {
    let forms = extract_forms(lines);
    if forms.is_empty() {
        return Ok(None);
    }

    let words: Vec<&str> = forms.iter().map(|f| f.word.as_str()).collect();
    let stem = find_stem(&words);

    let mut alt_forms = HashSet::new();
    let mut rules = Vec::with_capacity(forms.len());
    for form in &forms {
        let (prefix, suffix) = remove_stem(&form.word, &stem);
        rules.push(MorphRule {
            prefix: storage.intern_prefix(prefix)?,
            suffix: storage.intern_suffix(suffix)?,
            stress: form.stress,
            tag_group: storage.intern_tag_group(&form.grammemes)?,
        });
        if !form.alt.is_empty() {
            alt_forms.insert(form.alt.clone());
        }
    }

    // 規則0（見出し語）は据え置き、残りを並べ替えて直列化を入力順に
    // 依存しないものにする
    rules[1..].sort_unstable_by_key(|r| (r.prefix, r.suffix, r.tag_group, r.stress));

    Ok(Some(GeneratedParadigm {
        paradigm: paradigm::encode(&rules),
        stem,
        alt_forms,
    }))
}

/// 語幹を取り除いて接頭辞と接尾辞を返します。
///
/// 語幹が空の場合、語全体が接頭辞になります。
fn remove_stem<'a>(word: &'a str, stem: &str) -> (&'a str, &'a str) {
    if stem.is_empty() {
        return (word, "");
    }
    // 語幹は語幹探索によってすべての語形に含まれることが保証されている
    let start = word.find(stem).unwrap_or(0);
    (&word[..start], &word[start + stem.len()..])
}

/// 語の一覧から共通語幹を探します。
///
/// 先頭の語（見出し語の語形）を候補として、すべての語が候補を部分文字列
/// として含むまで窓を1文字ずつ後ろへずらし、右端を越えたら窓を1文字
/// 縮めて先頭へ戻します。最初に全語に含まれた候補が語幹です。長さ0まで
/// 縮んだ場合は空文字列を返します（接頭辞・接尾辞だけで語全体を表す）。
fn find_stem(words: &[&str]) -> String {
    let first = words[0];
    if words.len() == 1 {
        return first.to_string();
    }

    let chars: Vec<char> = first.chars().collect();
    let total = chars.len();
    let mut start = 0;
    let mut length = total;
    let mut candidate: String = first.to_string();
    while !candidate.is_empty() {
        if words.iter().all(|w| w.contains(&candidate)) {
            return candidate;
        }

        start += 1;
        if start + length > total {
            length -= 1;
            start = 0;
        }
        candidate = chars[start..start + length].iter().collect();
    }

    candidate
}

/// ブロックの行から語形タプルを抽出します。
///
/// 語形の綴りはキリル文字とハイフンに制限され、強勢記号付きの綴りには
/// アポストロフィも許されます。複数のアポストロフィは各候補位置ごとに
/// 1タプルへ展開されます。素の綴りとアポストロフィ除去後の綴りの長さが
/// 異なる場合、位置合わせは試みず強勢は不明（`0`）になります。
fn extract_forms(lines: &[String]) -> Vec<ExtractedForm> {
    let mut result = Vec::new();

    for line in lines {
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < 3 {
            continue;
        }
        // 空白を含む語形（複合表現）は扱わない
        if fields[0].trim().contains(' ') {
            continue;
        }

        let surface = utils::clean_surface(fields[0]);
        let marked = utils::clean_marked(fields[2]);
        let unmarked: String = marked.chars().filter(|&c| c != '\'').collect();
        let length_differs = surface.chars().count() != unmarked.chars().count();

        let mark_positions: Vec<usize> = marked
            .chars()
            .enumerate()
            .filter(|&(_, c)| c == '\'')
            .map(|(i, _)| i)
            .collect();
        let candidates: Vec<Option<usize>> = if mark_positions.is_empty() || length_differs {
            vec![None]
        } else {
            mark_positions.into_iter().map(Some).collect()
        };

        let grammemes: Vec<String> = fields[1]
            .trim()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        for position in candidates {
            let single_marked = match position {
                Some(keep) => keep_single_mark(&marked, keep),
                None => marked.clone(),
            };
            let stress = if length_differs {
                0
            } else {
                utils::find_stress(&single_marked)
            };
            let plain: String = single_marked.chars().filter(|&c| c != '\'').collect();

            if plain != surface {
                if plain.replace('ё', "е") == surface {
                    // ёを含む綴りを正とし、е綴りを別綴りとして索引する
                    result.push(ExtractedForm {
                        word: plain,
                        grammemes: grammemes.clone(),
                        stress,
                        alt: surface.clone(),
                    });
                } else {
                    result.push(ExtractedForm {
                        word: surface.clone(),
                        grammemes: grammemes.clone(),
                        stress,
                        alt: plain,
                    });
                }
            } else {
                result.push(ExtractedForm {
                    word: surface.clone(),
                    grammemes: grammemes.clone(),
                    stress,
                    alt: plain,
                });
            }
        }
    }

    result
}

/// 指定位置のアポストロフィだけを残した文字列を作ります。
fn keep_single_mark(marked: &str, keep: usize) -> String {
    marked
        .chars()
        .enumerate()
        .filter_map(|(i, c)| {
            if i == keep {
                Some('\'')
            } else if c == '\'' {
                None
            } else {
                Some(c)
            }
        })
        .collect()
}
