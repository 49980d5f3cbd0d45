//! # Console Prompter & Reporter
//!
//! Line-based terminal front end for [`vending_core::run_session`].
//!
//! ## Sample Session
//! ```text
//! 자판기가 보유하고 있는 금액을 입력해 주세요.
//! 450
//!
//! 자판기가 보유한 동전
//! 500원 - 0개
//! 100원 - 4개
//! 50원 - 1개
//! 10원 - 0개
//!
//! 상품명과 가격, 수량을 입력해 주세요.
//! [콜라,1500,20];[사이다,1000,10]
//!
//! 투입 금액을 입력해 주세요.
//! 3000
//!
//! 투입 금액: 3000원
//! 구매할 상품명을 입력해 주세요.
//! 콜라
//! 콜라 구매 완료 (1500원)
//!
//! 투입 금액: 1500원
//! 구매할 상품명을 입력해 주세요.
//! 사이다
//! 사이다 구매 완료 (1000원)
//!
//! 투입 금액: 500원
//! 잔돈
//! 100원 - 4개
//! 50원 - 1개
//! [WARN] 반환하지 못한 금액: 50원
//! ```
//!
//! Both types are generic over their reader/writer so tests can drive them
//! with in-memory buffers.

use std::fmt;
use std::io::{self, BufRead, Write};

use tracing::warn;
use vending_core::{
    Coin, CoinCounts, CoreError, Money, PromptKind, Prompter, Purchase, Reporter, Settlement,
};

// =============================================================================
// Prompter
// =============================================================================

/// Prints a question and reads one line per prompt.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsolePrompter { input, output }
    }

    fn question(kind: PromptKind) -> &'static str {
        match kind {
            PromptKind::CashFloat => "자판기가 보유하고 있는 금액을 입력해 주세요.",
            PromptKind::Catalog => "상품명과 가격, 수량을 입력해 주세요.",
            PromptKind::InsertedMoney => "투입 금액을 입력해 주세요.",
            PromptKind::Selection => "구매할 상품명을 입력해 주세요.",
        }
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn ask(&mut self, kind: PromptKind) -> Option<String> {
        let written = writeln!(self.output, "{}", Self::question(kind));
        if let Err(err) = written.and_then(|_| self.output.flush()) {
            warn!(error = %err, "could not write prompt");
            return None;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
            Err(err) => {
                warn!(error = %err, prompt = %kind, "could not read input");
                None
            }
        }
    }
}

// =============================================================================
// Reporter
// =============================================================================

/// Writes session events as console lines.
///
/// `Reporter` methods can't return errors, so the first write failure is
/// kept and surfaced by [`finish`](Self::finish); later writes are skipped.
pub struct ConsoleReporter<W> {
    output: W,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(output: W) -> Self {
        ConsoleReporter {
            output,
            error: None,
        }
    }

    /// Flushes and reports the first write error, if any.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.output.flush()?;
        Ok(self.output)
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        let written = self.output.write_fmt(args);
        if let Err(err) = written.and_then(|_| self.output.write_all(b"\n")) {
            self.error = Some(err);
        }
    }

    fn coin_lines(&mut self, coins: impl Iterator<Item = (Coin, u64)>) {
        for (coin, count) in coins {
            self.line(format_args!("{coin} - {count}개"));
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn coin_box(&mut self, coins: &CoinCounts) {
        self.line(format_args!(""));
        self.line(format_args!("자판기가 보유한 동전"));
        self.coin_lines(coins.iter());
        self.line(format_args!(""));
    }

    fn balance(&mut self, balance: Money) {
        self.line(format_args!(""));
        self.line(format_args!("투입 금액: {balance}"));
    }

    fn purchased(&mut self, purchase: &Purchase) {
        self.line(format_args!("{} 구매 완료 ({})", purchase.product, purchase.price));
    }

    fn rejected(&mut self, _kind: PromptKind, error: &CoreError) {
        self.line(format_args!("[ERROR] {error}"));
    }

    fn settled(&mut self, balance: Money, settlement: &Settlement) {
        self.line(format_args!(""));
        self.line(format_args!("투입 금액: {balance}"));
        self.line(format_args!("잔돈"));
        self.coin_lines(settlement.change.iter_nonzero());
        if settlement.shortfall.is_positive() {
            self.line(format_args!("[WARN] 반환하지 못한 금액: {}", settlement.shortfall));
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
