use std::io::{self, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};

use crate::domain::MatchResult;
use crate::infrastructure::LoggerTrait;
use crate::presentation::display;

/// 结果通道容量，写入跟不上时搜索任务在发送处等待
const REPORT_CHANNEL_CAPACITY: usize = 1024;

/// 结果输出器
///
/// 所有搜索任务通过通道把结果交给唯一的写线程，每个结果作为完整的一行写出，
/// 不同任务的输出不会在行内交错。
pub struct Reporter<W: Write + Send + 'static> {
    sender: Sender<MatchResult>,
    handle: JoinHandle<io::Result<(W, u64)>>,
}

/// 结果发送端，每个搜索任务持有一个
#[derive(Clone)]
pub struct ReportSender {
    sender: Sender<MatchResult>,
}

impl ReportSender {
    /// 提交一个匹配结果；写线程已退出时结果被丢弃，错误由 `Reporter::finalize` 返回
    pub fn emit(&self, result: MatchResult) {
        let _ = self.sender.send(result);
    }
}

impl<W: Write + Send + 'static> Reporter<W> {
    /// 启动写线程
    pub fn spawn(out: W, logger: Arc<dyn LoggerTrait>) -> Result<Self> {
        let (sender, receiver) = bounded::<MatchResult>(REPORT_CHANNEL_CAPACITY);

        let handle = thread::Builder::new()
            .name("reporter".to_string())
            .spawn(move || write_results(out, receiver, logger))
            .context("无法启动结果输出线程")?;

        Ok(Self { sender, handle })
    }

    /// 获取一个新的发送端
    pub fn sender(&self) -> ReportSender {
        ReportSender {
            sender: self.sender.clone(),
        }
    }

    /// 关闭通道并等待写线程结束，返回输出目标和写出的行数
    ///
    /// 调用前所有 `ReportSender` 都必须已经释放，否则会一直等待。
    pub fn finalize(self) -> Result<(W, u64)> {
        let Reporter { sender, handle } = self;
        drop(sender);

        let written = handle
            .join()
            .map_err(|_| anyhow!("结果输出线程异常退出"))?
            .context("写出搜索结果失败")?;

        Ok(written)
    }
}

fn write_results<W: Write>(mut out: W, receiver: Receiver<MatchResult>, logger: Arc<dyn LoggerTrait>) -> io::Result<(W, u64)> {
    let mut lines = 0;

    for result in receiver.iter() {
        display::write_match_line(&mut out, &result)?;
        lines += 1;

        if logger.is_enabled() {
            let _ = logger.log_match(&result.absolute_path, &result.term);
        }
    }

    out.flush()?;
    Ok((out, lines))
}
