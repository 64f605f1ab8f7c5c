// Supported market indices and their codes at the data providers

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexInfo {
    /// Internal symbol, exchange prefix plus code (e.g. `sh000001`).
    pub symbol: &'static str,
    pub name: &'static str,
    /// Exchange-qualified code (e.g. `000001.SH`).
    pub code: &'static str,
    /// Ticker on Yahoo Finance.
    pub yahoo_code: &'static str,
}

pub const SUPPORTED_INDICES: &[IndexInfo] = &[
    IndexInfo { symbol: "sh000001", name: "SSE Composite", code: "000001.SH", yahoo_code: "000001.SS" },
    IndexInfo { symbol: "sz399001", name: "SZSE Component", code: "399001.SZ", yahoo_code: "399001.SZ" },
    IndexInfo { symbol: "sz399006", name: "ChiNext", code: "399006.SZ", yahoo_code: "399006.SZ" },
    IndexInfo { symbol: "sh000016", name: "SSE 50", code: "000016.SH", yahoo_code: "000016.SS" },
    IndexInfo { symbol: "sh000688", name: "STAR 50", code: "000688.SH", yahoo_code: "000688.SS" },
    IndexInfo { symbol: "sh000300", name: "CSI 300", code: "000300.SH", yahoo_code: "000300.SS" },
    IndexInfo { symbol: "sh000905", name: "CSI 500", code: "000905.SH", yahoo_code: "000905.SS" },
    IndexInfo { symbol: "sh000852", name: "CSI 1000", code: "000852.SH", yahoo_code: "000852.SS" },
];

pub fn lookup(symbol: &str) -> Option<&'static IndexInfo> {
    SUPPORTED_INDICES.iter().find(|info| info.symbol == symbol)
}
