mod entry;
mod logger;

use speedprobe::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
