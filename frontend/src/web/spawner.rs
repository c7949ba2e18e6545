//! 基于 Leptos 的任务派发

use autofleet_hub::Spawner;
use futures::future::LocalBoxFuture;

/// 通过 `leptos::task::spawn_local` 在浏览器事件循环上运行后台任务
#[derive(Debug, Clone, Copy, Default)]
pub struct LeptosSpawner;

impl Spawner for LeptosSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        leptos::task::spawn_local(task);
    }
}
