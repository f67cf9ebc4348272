use std::ops::RangeInclusive;

use chrono::{Datelike, Local, Months, NaiveDate};
use snafu::{OptionExt, ensure};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::error::{InvalidDateSnafu, InvalidRangeSnafu, Result};

/// 月份, 名称用作分区/子分区名
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Month {
    Jan = 1,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub fn number(self) -> u32 {
        self as u32
    }

    /// 一月到十二月
    pub fn calendar_order() -> MonthIter {
        Month::iter()
    }

    /// `HASH(MONTH(col))` 把月份 m 放入第 `m % 12` 个子分区, 所以十二月排在第一位
    pub fn hash_order() -> impl Iterator<Item = Month> {
        std::iter::once(Month::Dec).chain(Month::iter().take(11))
    }
}

/// 起止年份 (闭区间)
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct YearSpan {
    start: i32,
    end: i32,
}

impl YearSpan {
    /// `end` 缺省时取当前年份; `start > end` 时报 `InvalidRange`
    pub fn new(start: i32, end: Option<i32>) -> Result<Self> {
        let end = end.unwrap_or_else(current_year);
        ensure!(start <= end, InvalidRangeSnafu { start, end });
        // 上界的下一年也必须是合法日期
        year_start(start)?;
        year_start(end.saturating_add(1))?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

pub fn current_year() -> i32 {
    Local::now().year()
}

pub fn year_start(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1).context(InvalidDateSnafu { year, month: 1u32 })
}

/// `[当月一号, 下月一号)`
pub fn month_bounds(year: i32, month: Month) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month.number(), 1).context(InvalidDateSnafu { year, month: month.number() })?;
    let next = start.checked_add_months(Months::new(1)).context(InvalidDateSnafu { year, month: month.number() })?;
    Ok((start, next))
}

/// `[当年一月一号, 次年一月一号)`
pub fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = year_start(year)?;
    let next = start.checked_add_months(Months::new(12)).context(InvalidDateSnafu { year, month: 1u32 })?;
    Ok((start, next))
}
