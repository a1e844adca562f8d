use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::infrastructure::{ErrorLogger, ErrorType};

/// 调度统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub dispatched: usize,
    pub completed: usize,
    pub failed: usize,
}

/// 容量受限的任务调度器
///
/// 每个任务运行在独立的线程上，同时运行的任务数不超过 `capacity`。
/// 槽位用通道实现：占用时发送一个令牌（满则等待），任务结束时取回一个令牌。
/// 通道容量取 `capacity` 与任务数中较小的一个。
pub struct TaskScheduler {
    capacity: NonZeroUsize,
    errors: Arc<ErrorLogger>,
}

/// 占用中的槽位，释放时归还
struct SlotPermit {
    slots: Receiver<()>,
}

impl Drop for SlotPermit {
    fn drop(&mut self) {
        let _ = self.slots.try_recv();
    }
}

impl TaskScheduler {
    pub fn new(capacity: NonZeroUsize, errors: Arc<ErrorLogger>) -> Self {
        Self { capacity, errors }
    }

    /// 依次启动所有任务，槽位占满时等待；所有任务结束后返回
    ///
    /// 任务 panic 或线程无法创建时记录错误并释放槽位，不影响其它任务。
    pub fn run<T, F>(&self, tasks: Vec<T>, work: F) -> SchedulerStats
    where
        T: Send,
        F: Fn(usize, T) + Sync,
    {
        // crossbeam 会按容量预先分配缓冲区，并发数不会超过任务数
        let slots = self.capacity.get().min(tasks.len()).max(1);
        let (slot_tx, slot_rx) = bounded::<()>(slots);
        let mut stats = SchedulerStats::default();

        thread::scope(|scope| {
            let work = &work;
            let mut handles = Vec::with_capacity(tasks.len());

            for (index, task) in tasks.into_iter().enumerate() {
                let permit = self.acquire(&slot_tx, &slot_rx);
                stats.dispatched += 1;

                let spawned = thread::Builder::new()
                    .name(format!("search-{}", index))
                    .spawn_scoped(scope, move || {
                        let _permit = permit;
                        work(index, task);
                    });

                match spawned {
                    Ok(handle) => handles.push((index, handle)),
                    Err(err) => {
                        stats.failed += 1;
                        let _ = self.errors.log_error(
                            ErrorType::TaskFailure,
                            None,
                            &format!("无法启动任务 {}: {}", index, err),
                        );
                    }
                }
            }

            for (index, handle) in handles {
                match handle.join() {
                    Ok(()) => stats.completed += 1,
                    Err(_) => {
                        stats.failed += 1;
                        let _ = self.errors.log_error(
                            ErrorType::TaskFailure,
                            None,
                            &format!("任务 {} 异常结束", index),
                        );
                    }
                }
            }
        });

        stats
    }

    fn acquire(&self, slot_tx: &Sender<()>, slot_rx: &Receiver<()>) -> SlotPermit {
        // 接收端一直由调用方持有，发送不会因断开而失败
        let _ = slot_tx.send(());
        SlotPermit {
            slots: slot_rx.clone(),
        }
    }
}
