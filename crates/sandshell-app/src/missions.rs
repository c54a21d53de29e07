//! Tutorial mission progression driven by processed command lines.

use std::cell::RefCell;
use std::rc::Rc;

use sandshell_terminal::ShellSession;

/// One mission stage: completed by a command starting with `prefix`.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub prefix: &'static str,
    pub dialogue: &'static str,
}

pub const TUTORIAL: &[Stage] = &[
    Stage {
        prefix: "cd /home/usuario1/Documentos",
        dialogue: "Excelente, ya te encuentras en el directorio donde está el archivo.\n\
                   Ahora falta listarlo para asegurarnos que se encuentra ahí.\n\
                   Para ello usaremos el comando `ls`. Solo tienes que escribir `ls` y pulsar intro.",
    },
    Stage {
        prefix: "ls",
        dialogue: "¡Perfecto! Has encontrado el archivo `IPS_El_Bohío.txt`.\n\
                   Ahora falta un paso más: ver el contenido de dicho fichero.\n\
                   Usa el comando `cat` seguido del nombre del fichero,\n\
                   por ejemplo: `cat IPS_El_Bohío.txt`.",
    },
];

/// Ordered stages with a cursor; finished dialogue waits in `messages`.
#[derive(Debug)]
pub struct MissionTracker {
    stages: &'static [Stage],
    current: usize,
    messages: Vec<String>,
}

impl MissionTracker {
    pub fn new(stages: &'static [Stage]) -> Self {
        Self {
            stages,
            current: 0,
            messages: Vec::new(),
        }
    }

    pub fn tutorial() -> Self {
        Self::new(TUTORIAL)
    }

    /// Subscribe a shared tracker to a session's notifications.
    pub fn attach(tracker: &Rc<RefCell<MissionTracker>>, session: &mut ShellSession) {
        let tracker = Rc::clone(tracker);
        session.subscribe(move |line| tracker.borrow_mut().on_command(line));
    }

    pub fn on_command(&mut self, line: &str) {
        let Some(stage) = self.stages.get(self.current) else {
            return;
        };
        if line.starts_with(stage.prefix) {
            log::info!("mission stage {} complete", self.current + 1);
            self.messages.push(stage.dialogue.to_string());
            self.current += 1;
        }
    }

    /// Dialogue produced since the last call.
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    pub fn current_stage(&self) -> usize {
        self.current
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.stages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_in_order() {
        let mut t = MissionTracker::tutorial();
        t.on_command("ls");
        assert_eq!(t.current_stage(), 0);
        t.on_command("cd /home/usuario1/Documentos");
        assert_eq!(t.current_stage(), 1);
        t.on_command("ls -la");
        assert!(t.is_complete());
        let msgs = t.take_messages();
        assert_eq!(msgs.len(), 2);
        assert!(msgs[0].contains("`ls`"));
        assert!(msgs[1].contains("cat IPS_El_Bohío.txt"));
        assert!(t.take_messages().is_empty());
    }

    #[test]
    fn completed_tracker_ignores_commands() {
        let mut t = MissionTracker::new(&[]);
        assert!(t.is_complete());
        t.on_command("ls");
        assert!(t.take_messages().is_empty());
    }
}
