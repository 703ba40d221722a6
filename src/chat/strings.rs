//! Fixed UI text: mode labels, sentinel answers and display messages.
//!
//! The sentinel answers are the exact strings the generation prompt
//! instructs the model to return when no usable match exists; comparing
//! against anything else breaks the no-match branches downstream.

pub const APP_TITLE: &str = "社内情報特化型生成AI検索アプリ";

/// Mode label: find where a document lives.
pub const ANSWER_MODE_DOC_SEARCH: &str = "社内文書検索";
/// Mode label: answer a question from document contents.
pub const ANSWER_MODE_INQUIRY: &str = "社内問い合わせ";

/// Generated answer meaning "no relevant document" in document search mode.
pub const NO_DOC_MATCH_ANSWER: &str = "該当資料なし";
/// Message shown (and stored) when document search finds nothing.
pub const NO_DOC_MATCH_MESSAGE: &str =
    "入力内容と関連する社内文書が見つかりませんでした。入力内容を変更してください。";
/// Generated answer meaning "no usable information" in inquiry mode.
pub const INQUIRY_NO_MATCH_ANSWER: &str = "回答に必要な情報が見つかりませんでした。";

/// Lead-in above the main document citation.
pub const MAIN_DOC_MESSAGE: &str =
    "入力内容に関する情報は、以下のファイルに含まれている可能性があります。";
/// Lead-in above the secondary document candidates.
pub const SUB_DOC_MESSAGE: &str = "その他、ファイルありかの候補を提示します。";
/// Label of the citation block in inquiry mode.
pub const SOURCE_LABEL: &str = "情報源";

pub const GREETING_MESSAGE: &str = "こんにちは。私は社内文書の情報をもとに回答する生成AIチャットボットです。サイドバーで利用目的を選択し、画面下部のチャット欄からメッセージを送信してください。";
pub const WARNING_MESSAGE: &str = "具体的に入力したほうが的確通りの回答を得やすいです。";
pub const WARNING_ICON: &str = "⚠️";

pub const DOC_SEARCH_GUIDE: &str = "入力内容と関連性が高い社内文書のありかを検索できます。";
pub const DOC_SEARCH_EXAMPLE: &str = "社員の育成方針に関するMTGの議事録";
pub const INQUIRY_GUIDE: &str = "質問・要望に対して、社内文書をもとに回答を得られます。";
pub const INQUIRY_EXAMPLE: &str = "人事に所属している従業員情報を一覧化して";
