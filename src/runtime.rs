//! 单线程任务派发
//!
//! 远端读写都是 "发出即忘" 的后台任务。核心不绑定具体执行器：
//! 浏览器中交给 `spawn_local`，测试中可以排队后按任意顺序手动执行。

use futures::future::LocalBoxFuture;

pub trait Spawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// 将任务排入队列，由调用方手动驱动
#[cfg(test)]
#[derive(Clone, Default)]
pub struct QueueSpawner {
    queue: std::rc::Rc<std::cell::RefCell<Vec<LocalBoxFuture<'static, ()>>>>,
}

#[cfg(test)]
impl QueueSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// 依次执行所有已排队的任务（包括执行过程中新排入的任务）
    pub async fn run_all(&self) {
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                if queue.is_empty() {
                    None
                } else {
                    Some(queue.remove(0))
                }
            };
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }
}

#[cfg(test)]
impl Spawner for QueueSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.queue.borrow_mut().push(task);
    }
}
