use system_shell::{builtin_registry, BuiltinInvocation};
use system_shell_contract::ShellError;

use crate::runtime_context::DesktopRuntime;

mod apps;
mod filesystem;
mod windows;

pub(super) fn run_builtin(
    runtime: &mut DesktopRuntime,
    invocation: BuiltinInvocation,
) -> Result<String, ShellError> {
    tracing::debug!(command = invocation.name(), "running builtin");
    match invocation {
        BuiltinInvocation::Help => Ok(builtin_registry().help_text()),
        BuiltinInvocation::Clear => Ok(String::new()),
        BuiltinInvocation::Windows => Ok(windows::list(runtime.state())),
        BuiltinInvocation::Apps => Ok(apps::list(runtime.state())),
        BuiltinInvocation::Ls { path } => Ok(filesystem::ls(runtime.fs(), &path)),
        BuiltinInvocation::Cat { path } => Ok(filesystem::cat(runtime.fs(), &path)),
        BuiltinInvocation::Mkdir { name } => filesystem::mkdir(runtime.fs_mut(), &name),
        BuiltinInvocation::Touch { name } => filesystem::touch(runtime.fs_mut(), &name),
    }
}
