use crate::naming::split_camel_words;

/// Fixed `(term, ko, en)` translations for common last key segments.
pub const COMMON_TERMS: &[(&str, &str, &str)] = &[
    // actions
    ("register", "등록", "Register"),
    ("edit", "수정", "Edit"),
    ("delete", "삭제", "Delete"),
    ("save", "저장", "Save"),
    ("cancel", "취소", "Cancel"),
    ("confirm", "확인", "Confirm"),
    ("close", "닫기", "Close"),
    ("search", "검색", "Search"),
    ("reset", "초기화", "Reset"),
    ("add", "추가", "Add"),
    ("remove", "제거", "Remove"),
    ("copy", "복사", "Copy"),
    ("print", "인쇄", "Print"),
    ("export", "내보내기", "Export"),
    ("import", "가져오기", "Import"),
    // views
    ("list", "목록", "List"),
    ("status", "현황", "Status"),
    ("detailList", "상세 목록", "Detail List"),
    ("overallStatus", "전체 현황", "Overall Status"),
    ("analysis", "분석", "Analysis"),
    ("summary", "요약", "Summary"),
    ("detail", "상세", "Detail"),
    ("info", "정보", "Information"),
    ("management", "관리", "Management"),
    // time
    ("today", "오늘", "Today"),
    ("yesterday", "어제", "Yesterday"),
    ("thisWeek", "이번 주", "This Week"),
    ("thisMonth", "이번 달", "This Month"),
    ("thisYear", "올해", "This Year"),
    ("recent", "최근", "Recent"),
    // states
    ("active", "활성", "Active"),
    ("inactive", "비활성", "Inactive"),
    ("pending", "대기", "Pending"),
    ("completed", "완료", "Completed"),
    ("cancelled", "취소됨", "Cancelled"),
    ("draft", "임시저장", "Draft"),
    // messages
    ("loading", "로딩 중...", "Loading..."),
    ("noData", "데이터가 없습니다", "No Data Available"),
    ("error", "오류가 발생했습니다", "An Error Occurred"),
    ("success", "성공했습니다", "Success"),
    ("failed", "실패했습니다", "Failed"),
    ("required", "필수 항목입니다", "Required"),
    ("optional", "선택 항목입니다", "Optional"),
];

pub fn common_term(segment: &str) -> Option<(&'static str, &'static str)> {
    COMMON_TERMS
        .iter()
        .find(|(term, _, _)| *term == segment)
        .map(|(_, ko, en)| (*ko, *en))
}

/// Guess `(ko, en)` values for a key missing from the catalogs.
///
/// The last dotted segment is looked up in [`COMMON_TERMS`]; otherwise its
/// camelCase words are dressed according to what the key names. Markers are
/// matched case-insensitively, so `select.vendorPlaceholder` is a placeholder.
pub fn synthesize(key: &str) -> (String, String) {
    let last = key.rsplit('.').next().unwrap_or(key);
    if let Some((ko, en)) = common_term(last) {
        return (ko.to_string(), en.to_string());
    }

    let words = split_camel_words(last);
    let lower = key.to_lowercase();
    if lower.contains("placeholder") {
        (format!("{words}을 선택하세요"), format!("Select {words}"))
    } else if lower.contains("title") {
        (format!("{words} 제목"), format!("{words} Title"))
    } else if lower.contains("label") || lower.contains("action") {
        (words.clone(), words)
    } else {
        (
            format!("[번역필요] {words}"),
            format!("[Need Translation] {words}"),
        )
    }
}
