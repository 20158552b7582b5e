//! 主题导出流程 - 流程层
//!
//! 核心职责：定义"一个主题"的完整导出操作
//!
//! 流程顺序：
//! 1. 打开主题结果页 → 等待渲染
//! 2. 打开日期选择器 → 选"自定义"（可选）
//! 3. 填入开始/结束日期（结束日 +1）→ 应用
//! 4. 导出 → CSV → 等待下载写盘
//!
//! 下载开始即返回成功，文件是否写完由归档前的定位判断。

use chrono::NaiveDate;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::{SiteConfig, Timings};
use crate::error::AppResult;
use crate::infrastructure::{wait_required, ClickMode, Locator, PageDriver};
use crate::models::UiDateRange;
use crate::selectors;
use crate::workflow::export_ctx::ExportCtx;

/// 步骤名称，出现在失败原因里
pub mod steps {
    pub const OPEN_TOPIC: &str = "打开主题页";
    pub const OPEN_DATE_PICKER: &str = "打开日期选择器";
    pub const COMPUTE_RANGE: &str = "计算日期范围";
    pub const ENTER_DATES: &str = "填写日期";
    pub const APPLY_RANGE: &str = "应用日期";
    pub const TRIGGER_EXPORT: &str = "点击导出";
    pub const SELECT_CSV: &str = "选择 CSV";
}

/// 主题导出流程
///
/// - 不持有浏览器，每次调用借用会话的页面
/// - 每一步受统一等待上限约束，任何一步失败本条即失败
pub struct ExportWorkflow {
    site: SiteConfig,
    timings: Timings,
}

impl ExportWorkflow {
    pub fn new(site: SiteConfig, timings: Timings) -> Self {
        Self { site, timings }
    }

    /// 下载已触发返回 true
    pub async fn run(
        &self,
        driver: &dyn PageDriver,
        ctx: &ExportCtx,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> bool {
        match self.try_run(driver, ctx, start_date, end_date).await {
            Ok(()) => true,
            Err(e) => {
                error!("{} ❌ 导出失败: {}", ctx, e);
                false
            }
        }
    }

    /// 同 `run`，失败时带上出错的步骤
    pub async fn try_run(
        &self,
        driver: &dyn PageDriver,
        ctx: &ExportCtx,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<()> {
        self.open_topic(driver, ctx)
            .await
            .map_err(|e| e.at_step(steps::OPEN_TOPIC))?;

        self.open_date_picker(driver)
            .await
            .map_err(|e| e.at_step(steps::OPEN_DATE_PICKER))?;

        self.choose_custom_range(driver).await;

        let range = UiDateRange::for_export(start_date, end_date)
            .map_err(|e| e.at_step(steps::COMPUTE_RANGE))?;
        info!("{} 📅 设置日期: {} - {}", ctx, range.start, range.end);

        self.enter_dates(driver, &range)
            .await
            .map_err(|e| e.at_step(steps::ENTER_DATES))?;

        driver
            .click(&Locator::css(selectors::APPLY_BUTTON), ClickMode::Native)
            .await
            .map_err(|e| e.at_step(steps::APPLY_RANGE))?;
        debug!("{} 日期已应用", ctx);
        sleep(self.timings.apply_settle).await;

        self.trigger_export(driver)
            .await
            .map_err(|e| e.at_step(steps::TRIGGER_EXPORT))?;
        sleep(self.timings.menu_settle).await;

        self.select_csv(driver)
            .await
            .map_err(|e| e.at_step(steps::SELECT_CSV))?;
        info!("{} ⬇️ 已开始下载", ctx);

        // 没有下载完成信号，只能固定等待
        sleep(self.timings.download_settle).await;
        Ok(())
    }

    async fn open_topic(&self, driver: &dyn PageDriver, ctx: &ExportCtx) -> AppResult<()> {
        let url = self.site.results_url(&ctx.topic_id);
        info!("{} 🔗 打开主题: {}", ctx, url);
        driver.goto(&url).await?;
        // 前端渲染没有就绪信号
        sleep(self.timings.page_settle).await;
        Ok(())
    }

    async fn open_date_picker(&self, driver: &dyn PageDriver) -> AppResult<()> {
        let wrapper = Locator::class(selectors::DATEPICKER_WRAPPER);
        wait_required(driver, &wrapper, self.timings.wait_timeout, self.timings.poll_interval)
            .await?;
        driver.click(&wrapper, ClickMode::Native).await?;
        sleep(self.timings.picker_settle).await;
        Ok(())
    }

    /// 有"自定义"菜单项就点，没有不算错
    async fn choose_custom_range(&self, driver: &dyn PageDriver) {
        let custom = Locator::xpath(selectors::CUSTOM_RANGE_ITEM);
        let clicked = match driver.is_present(&custom).await {
            Ok(true) => driver.click(&custom, ClickMode::Native).await.is_ok(),
            _ => false,
        };
        debug!("自定义范围菜单: {}", if clicked { "已选择" } else { "无" });
        sleep(self.timings.picker_settle).await;
    }

    async fn enter_dates(&self, driver: &dyn PageDriver, range: &UiDateRange) -> AppResult<()> {
        let start_input = Locator::name(selectors::RANGE_START_FIELD);
        let end_input = Locator::name(selectors::RANGE_END_FIELD);

        wait_required(driver, &start_input, self.timings.wait_timeout, self.timings.poll_interval)
            .await?;
        driver.replace_text(&start_input, &range.start).await?;
        driver.replace_text(&end_input, &range.end).await?;
        Ok(())
    }

    async fn trigger_export(&self, driver: &dyn PageDriver) -> AppResult<()> {
        let chain = selectors::export_button();
        let button = chain
            .resolve(driver, self.timings.wait_timeout, self.timings.poll_interval)
            .await?;
        driver.click(button, ClickMode::Native).await
    }

    async fn select_csv(&self, driver: &dyn PageDriver) -> AppResult<()> {
        let chain = selectors::csv_option();
        let option = chain
            .resolve(driver, self.timings.wait_timeout, self.timings.poll_interval)
            .await?;
        driver.click(option, ClickMode::Native).await
    }
}
