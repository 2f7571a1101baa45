//! Product codes sold in the web shop and the services they map to.

use crate::models::ServiceSummary;
use serde::{Deserialize, Serialize};

/// Purchased product codes grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchasedServices {
    pub plan: Vec<String>,
    pub additional: Vec<String>,
}

static SERVICE_CODES: &[(&str, i64, &str)] = &[
    ("4cbbb6c9b8c1993f25adc601867b7917", 1, "白金月繳"),
    ("5994d46e05899d30fae4d0834d0cefc9", 2, "白金年繳"),
    ("793749b3f3dca5aff3a2cc740dd48663", 3, "白金三年繳"),
    ("88efa90d501f45f59309e8132e55c89f", 43, "達人組合年繳 - 品牌網站加強版"),
    ("5be00891e015c85aefb72fc209944036", 44, "達人組合年繳  - 購物網站加強版"),
    ("5a35a388e29b22ef88d5502b77583498", 45, "達人組合年繳  - 品牌+購物網站加強版"),
    ("c04452dda757d474e1071c54926a9a33", 51, "達人組合年繳  - Google 搜尋全方位網站加強版"),
    ("b6edb58881fe6e46b9c7af64692a5f86", 47, "達人組合三年繳 - 品牌網站加強版"),
    ("d6bc9d0a1fab5bf0dd87484616a4bc31", 48, "達人組合三年繳  - 購物網站加強版"),
    ("05fda11050ed8f7db3ddfa234624f33c", 49, "達人組合三年繳  - 品牌+購物網站加強版"),
    ("ce7e449d9faa3fc4d6403aa5815dd9a3", 52, "達人組合三年繳  - Google 搜尋全方位網站加強版"),
    ("8c07f3098f7de905d73c47150aa9efcd", 4, "追蹤碼安裝"),
    ("fa57f15403eef809b750f44fcf53606e", 5, "Google 分析報表寄送"),
    ("ef52fa11e0702edfa82efde1656c8a4a", 6, "1 對 1 電話諮詢"),
    ("a5d0506b19a3a611cd296589caf155aa", 7, "網站圖示"),
    ("77c9dc7152cf95d5754c69c5dd114e77", 8, "微電商網站代號變更"),
    ("afeae76b04f552528ff761d441e202b0", 9, "自動轉址設定"),
    ("1b8e735c38f4398b83a03cc12c1dcf2f", 10, "子網域設定"),
    ("dccc0ae11a314ad38c3682a5d3868f1f", 11, "Google 搜尋引擎"),
    ("55cb5045c14558090b5a6591553456e8", 12, "客服連結按鈕"),
    ("92fc40abc228dc1f1158ef7ea26b66e6", 13, "威旭客戶專屬白金"),
    ("3c41b2349628e3451e8a2bbc13418c4f", 14, "白金日繳"),
    ("190ff2ccc4304aab384b59cac5f100e9", 15, "多語言選單"),
    ("c4db3b906be96ef11c01a14e229cd484", 26, "Yahoo 關鍵字品牌推廣 - 小資限定"),
    ("fef93fa8deb3ee76b717f7ea20cf5acb", 27, "Yahoo 關鍵字品牌推廣 - 達人限定"),
    ("9477bb92b8a79849f0d62ee4b360f9b9", 33, "Facebook 商業擴充功能 (FBE) + 轉換 API"),
    ("e9ace661b48be40f8f4da680c700ed97", 50, "Google 品牌關鍵字推廣"),
    ("30e35aa8bf07903ad7628852a1c14db6", 53, "客製化網站圖片"),
    ("6ad16dcba3b246c8b12553d6dab6e28c", 54, "15 秒圖文剪輯影音"),
    ("8886ae1551ddc98ca0a44ccfb8989603", 55, "Facebook 社群小編"),
];

/// Look up a single product code.
pub fn service_for_code(code: &str) -> Option<ServiceSummary> {
    SERVICE_CODES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, service_id, text)| ServiceSummary {
            service_id: *service_id,
            text: text.to_string(),
        })
}

/// Resolve purchased codes to services, plans first. Unknown codes are
/// dropped.
pub fn user_services(data: &PurchasedServices) -> Vec<ServiceSummary> {
    data.plan
        .iter()
        .chain(data.additional.iter())
        .filter_map(|code| service_for_code(code))
        .collect()
}
