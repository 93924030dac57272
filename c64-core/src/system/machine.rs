//! The complete machine and its tick loop.
//!
//! One call to [`Machine::tick`] advances every chip by one PAL clock cycle
//! in a fixed order: the VIC first (it may steal the bus or raise IRQ), then
//! the CPU, then both CIAs. The chips never reference each other. The VIC
//! and the CIAs are reached by the CPU through range watchers on the
//! [`AddressBus`], and all interrupt traffic goes through its
//! [`InterruptLines`](super::interrupts::InterruptLines).

use super::address_bus::AddressBus;
use super::interrupts::{Line, Source};
use super::keyboard::KeyMatrix;
use super::monitor::{Monitor, TraceEntry};
use super::patches::{ByteCursor, PatchTable};
use super::snapshot::{Snapshot, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
use crate::config::MachineConfig;
use crate::devices::cia::{Cia, CiaKind};
use crate::devices::vic::{Frame, Vic, CYCLES_PER_LINE, LINES_PER_FRAME};
use crate::error::Result;
use crate::roms::RomSet;
use lib6510::{MemoryBus, CPU, OPCODE_TABLE};
use log::{debug, info, trace};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Ticks in one PAL frame (63 cycles x 312 lines).
pub const CYCLES_PER_FRAME: u32 = CYCLES_PER_LINE * LINES_PER_FRAME as u32;

/// VIC register window, mirrored every 64 bytes.
const VIC_RANGE: std::ops::RangeInclusive<u16> = 0xD000..=0xD3FF;
const CIA1_RANGE: std::ops::RangeInclusive<u16> = 0xDC00..=0xDCFF;
const CIA2_RANGE: std::ops::RangeInclusive<u16> = 0xDD00..=0xDDFF;

/// Receives every completed frame.
pub trait FrameSink {
    fn present(&mut self, frame: &Frame);
}

/// Host input as sampled at a poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub keys: KeyMatrix,
    /// RESTORE is wired to NMI, not to the keyboard matrix
    pub restore: bool,
}

/// Supplies host input every `input_poll_interval` ticks.
pub trait InputSource {
    fn poll(&mut self) -> InputState;
}

/// A Commodore 64.
pub struct Machine {
    cpu: CPU<AddressBus>,
    vic: Rc<RefCell<Vic>>,
    cia1: Rc<RefCell<Cia>>,
    cia2: Rc<RefCell<Cia>>,
    config: MachineConfig,
    monitor: Monitor,
    patches: PatchTable,
    cursor: Option<Box<dyn ByteCursor>>,
    sink: Option<Box<dyn FrameSink>>,
    input: Option<Box<dyn InputSource>>,
    ticks: u64,
    reset_requested: bool,
    /// PC whose boundary checks already ran
    boundary_pc: Option<u16>,
}

impl Machine {
    /// Builds a powered-on machine. The CPU starts at the KERNAL reset vector.
    pub fn new(roms: &RomSet, config: MachineConfig) -> Self {
        let mut bus = AddressBus::new(roms);

        let vic = Rc::new(RefCell::new(Vic::new()));
        let cia1 = Rc::new(RefCell::new(Cia::new(CiaKind::Cia1)));
        let cia2 = Rc::new(RefCell::new(Cia::new(CiaKind::Cia2)));

        let chip = Rc::clone(&vic);
        bus.register_read_watcher(VIC_RANGE, move |addr| chip.borrow_mut().read(addr));
        let chip = Rc::clone(&vic);
        bus.register_write_watcher(VIC_RANGE, move |addr, value| {
            chip.borrow_mut().write(addr, value)
        });

        for (range, cia) in [(CIA1_RANGE, &cia1), (CIA2_RANGE, &cia2)] {
            let chip = Rc::clone(cia);
            bus.register_read_watcher(range.clone(), move |addr| chip.borrow_mut().read(addr));
            let chip = Rc::clone(cia);
            bus.register_write_watcher(range, move |addr, value| {
                chip.borrow_mut().write(addr, value)
            });
        }

        let mut monitor = Monitor::new();
        for &pc in &config.breakpoints {
            monitor.add_breakpoint(pc);
        }
        for &(start, end) in &config.tracepoints {
            monitor.add_tracepoint(start..=end);
        }

        let patches = if config.kernal_serial_patches {
            PatchTable::kernal_serial()
        } else {
            PatchTable::new()
        };

        Self {
            cpu: CPU::new(bus),
            vic,
            cia1,
            cia2,
            config,
            monitor,
            patches,
            cursor: None,
            sink: None,
            input: None,
            ticks: 0,
            reset_requested: false,
            boundary_pc: None,
        }
    }

    /// Loads the ROM set from `dir` and builds a machine.
    pub fn from_rom_dir(dir: impl AsRef<Path>, config: MachineConfig) -> Result<Self> {
        let roms = RomSet::load_dir(dir)?;
        Ok(Self::new(&roms, config))
    }

    /// Advances the machine by one clock cycle.
    ///
    /// Returns the frame the VIC completed on this tick, if any. While the
    /// monitor is halted nothing moves and `None` is returned.
    pub fn tick(&mut self) -> Option<Frame> {
        if std::mem::take(&mut self.reset_requested) {
            self.reset();
        }

        if self.config.input_poll_interval > 0
            && self.ticks % u64::from(self.config.input_poll_interval) == 0
        {
            self.poll_input();
        }

        if self.monitor.is_halted() {
            return None;
        }

        let mut boundary = None;
        if self.cpu.at_instruction_boundary() {
            let pc = self.cpu.pc();
            if self.boundary_pc != Some(pc) {
                if self.monitor.check_break(pc) {
                    info!("breakpoint at ${:04X}", pc);
                    return None;
                }
                self.boundary_pc = Some(pc);
                self.trace_instruction(pc);
            }
            boundary = Some(pc);
        }

        let bank = self.cia2.borrow().vic_bank();
        let frame = self.vic.borrow_mut().step(self.cpu.memory_mut(), bank);
        if let (Some(frame), Some(sink)) = (&frame, self.sink.as_mut()) {
            sink.present(frame);
        }

        let patched = match boundary {
            Some(pc) if self.patches_live() => self.apply_patch(pc),
            _ => false,
        };
        if !patched {
            self.cpu.tick();
        }
        if !self.cpu.at_instruction_boundary() {
            self.boundary_pc = None;
        }

        let lines = self.cpu.memory_mut().interrupts_mut();
        self.cia1.borrow_mut().step(lines);
        self.cia2.borrow_mut().step(lines);

        self.ticks += 1;
        frame
    }

    /// Ticks until the VIC completes a frame or the monitor halts.
    pub fn run_frame(&mut self) -> Option<Frame> {
        loop {
            if let Some(frame) = self.tick() {
                return Some(frame);
            }
            if self.monitor.is_halted() {
                return None;
            }
        }
    }

    /// Resets the machine at the start of the next tick. RAM survives.
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    fn reset(&mut self) {
        info!("machine reset");
        let bus = self.cpu.memory_mut();
        bus.reset_port();
        bus.interrupts_mut().reset();
        self.vic.borrow_mut().reset();
        self.cia1.borrow_mut().reset();
        self.cia2.borrow_mut().reset();
        self.cpu.reset();
        self.monitor.discard_halt();
        self.boundary_pc = None;
    }

    fn poll_input(&mut self) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        let state = input.poll();
        self.cia1.borrow_mut().set_keys(state.keys);
        self.cpu
            .memory_mut()
            .interrupts_mut()
            .drive(Source::Restore, Line::Nmi, state.restore);
    }

    fn trace_instruction(&mut self, pc: u16) {
        if !self.monitor.is_traced(pc) {
            return;
        }
        let opcode = self.cpu.memory().read(pc);
        let entry = TraceEntry {
            pc,
            opcode,
            a: self.cpu.a(),
            x: self.cpu.x(),
            y: self.cpu.y(),
            sp: self.cpu.sp(),
            status: self.cpu.status(),
            cycles: self.cpu.cycles(),
        };
        match OPCODE_TABLE[opcode as usize].mnemonic {
            Some(mnemonic) => trace!(
                "${:04X} {:02X} {} A={:02X} X={:02X} Y={:02X} SP={:02X} P={:02X}",
                pc, opcode, mnemonic, entry.a, entry.x, entry.y, entry.sp, entry.status
            ),
            None => trace!("${:04X} {:02X} ???", pc, opcode),
        }
        self.monitor.record(entry);
    }

    /// Patches only stand in for the KERNAL while it is banked in, and only
    /// on a tick the CPU would actually get to fetch.
    fn patches_live(&self) -> bool {
        let bus = self.cpu.memory();
        bus.hiram() && bus.interrupts().bus_cycles() == 0 && !self.cpu.is_stalled()
    }

    fn apply_patch(&mut self, pc: u16) -> bool {
        let Some(patch) = self.patches.get(pc) else {
            return false;
        };
        debug!("patch {:?} at ${:04X}", patch, pc);
        match self.cursor.as_mut() {
            Some(cursor) => patch.apply(&mut self.cpu, Some(cursor.as_mut())),
            None => patch.apply(&mut self.cpu, None),
        }
        true
    }

    // ========== Monitor ==========

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut Monitor {
        &mut self.monitor
    }

    /// Leaves a breakpoint halt, optionally continuing from `pc`.
    pub fn resume(&mut self, pc: Option<u16>) {
        if let Some(pc) = pc {
            self.cpu.set_pc(pc);
            self.boundary_pc = None;
        }
        self.monitor.resume();
    }

    // ========== Adapters ==========

    /// Installs the display adapter.
    pub fn set_frame_sink(&mut self, sink: impl FrameSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn set_input_source(&mut self, input: impl InputSource + 'static) {
        self.input = Some(Box::new(input));
    }

    /// Installs the byte stream read by the serial-bus patch.
    pub fn set_byte_cursor(&mut self, cursor: impl ByteCursor + 'static) {
        self.cursor = Some(Box::new(cursor));
    }

    pub fn clear_byte_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn patches(&self) -> &PatchTable {
        &self.patches
    }

    pub fn patches_mut(&mut self) -> &mut PatchTable {
        &mut self.patches
    }

    // ========== Inspection ==========

    pub fn cpu(&self) -> &CPU<AddressBus> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU<AddressBus> {
        &mut self.cpu
    }

    pub fn bus(&self) -> &AddressBus {
        self.cpu.memory()
    }

    pub fn bus_mut(&mut self) -> &mut AddressBus {
        self.cpu.memory_mut()
    }

    pub fn vic(&self) -> std::cell::Ref<'_, Vic> {
        self.vic.borrow()
    }

    pub fn vic_mut(&self) -> std::cell::RefMut<'_, Vic> {
        self.vic.borrow_mut()
    }

    pub fn cia1(&self) -> std::cell::Ref<'_, Cia> {
        self.cia1.borrow()
    }

    pub fn cia2(&self) -> std::cell::Ref<'_, Cia> {
        self.cia2.borrow()
    }

    /// Replaces the keys CIA1 sees until the next input poll.
    pub fn set_keys(&mut self, keys: KeyMatrix) {
        self.cia1.borrow_mut().set_keys(keys);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    // ========== Snapshots ==========

    pub fn snapshot(&self) -> Snapshot {
        let bus = self.cpu.memory();
        Snapshot {
            magic: SNAPSHOT_MAGIC.to_string(),
            version: SNAPSHOT_VERSION,
            ticks: self.ticks,
            cpu: self.cpu.state(),
            ram: bus.ram().to_vec(),
            interrupts: bus.interrupts().clone(),
            vic: self.vic.borrow().state(),
            cia1: self.cia1.borrow().clone(),
            cia2: self.cia2.borrow().clone(),
        }
    }

    /// Restores `snapshot`. Adapters stay installed; a monitor halt is dropped.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        let bus = self.cpu.memory_mut();
        bus.load_ram(&snapshot.ram);
        *bus.interrupts_mut() = snapshot.interrupts.clone();
        self.vic.borrow_mut().restore_state(&snapshot.vic);
        *self.cia1.borrow_mut() = snapshot.cia1.clone();
        *self.cia2.borrow_mut() = snapshot.cia2.clone();
        self.cpu.restore_state(&snapshot.cpu);
        self.ticks = snapshot.ticks;
        self.reset_requested = false;
        self.boundary_pc = None;
        self.monitor.discard_halt();
        info!("restored snapshot at tick {}", self.ticks);
    }

    /// Snapshot as opaque bytes.
    pub fn save_state(&self) -> Result<Vec<u8>> {
        self.snapshot().to_bytes()
    }

    /// Restores bytes produced by [`Machine::save_state`].
    pub fn load_state(&mut self, bytes: &[u8]) -> Result<()> {
        let snapshot = Snapshot::from_bytes(bytes)?;
        self.restore(&snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::keyboard::keys;

    /// Machine with a blank ROM set running `program` from $C000.
    fn machine_with(program: &[u8], config: MachineConfig) -> Machine {
        let mut roms = RomSet::blank(0xC000);
        // IRQ/NMI vectors into RAM at $C100 / $C200
        roms.kernal_mut()[0x1FFA] = 0x00;
        roms.kernal_mut()[0x1FFB] = 0xC2;
        roms.kernal_mut()[0x1FFE] = 0x00;
        roms.kernal_mut()[0x1FFF] = 0xC1;
        let mut machine = Machine::new(&roms, config);
        for (i, &byte) in program.iter().enumerate() {
            machine.bus_mut().raw_write(0xC000 + i as u16, byte);
        }
        machine
    }

    fn no_patches() -> MachineConfig {
        MachineConfig {
            kernal_serial_patches: false,
            ..MachineConfig::default()
        }
    }

    #[test]
    fn test_lda_immediate_takes_two_ticks() {
        let mut machine = machine_with(&[0xA9, 0x42, 0x4C, 0x02, 0xC0], no_patches());
        machine.tick();
        machine.tick();
        assert_eq!(machine.cpu().a(), 0x42);
        assert_eq!(machine.cpu().pc(), 0xC002);
        assert!(!machine.cpu().flag_z());
        assert!(!machine.cpu().flag_n());
    }

    #[test]
    fn test_frame_every_cycles_per_frame_ticks() {
        let mut machine = machine_with(&[0x4C, 0x00, 0xC0], no_patches());
        let mut frames = 0;
        for _ in 0..CYCLES_PER_FRAME {
            if machine.tick().is_some() {
                frames += 1;
            }
        }
        assert_eq!(frames, 1);
        assert_eq!(machine.ticks(), u64::from(CYCLES_PER_FRAME));
    }

    #[test]
    fn test_cpu_writes_reach_vic_through_watchers() {
        // LDA #$05; STA $D020; JMP *
        let program = [0xA9, 0x05, 0x8D, 0x20, 0xD0, 0x4C, 0x05, 0xC0];
        let mut machine = machine_with(&program, no_patches());
        for _ in 0..10 {
            machine.tick();
        }
        assert_eq!(machine.vic().border_color(), 0x05);
    }

    #[test]
    fn test_breakpoint_halts_and_resumes() {
        let config = MachineConfig {
            breakpoints: vec![0xC002],
            ..no_patches()
        };
        let mut machine = machine_with(&[0xEA, 0xEA, 0xEA, 0x4C, 0x03, 0xC0], config);
        for _ in 0..10 {
            machine.tick();
        }
        assert_eq!(machine.monitor().halted_at(), Some(0xC002));
        assert_eq!(machine.cpu().pc(), 0xC002);
        let ticks = machine.ticks();

        machine.tick();
        assert_eq!(machine.ticks(), ticks);

        machine.resume(None);
        machine.tick();
        machine.tick();
        assert_eq!(machine.cpu().pc(), 0xC003);
    }

    #[test]
    fn test_resume_from_new_pc() {
        let config = MachineConfig {
            breakpoints: vec![0xC000],
            ..no_patches()
        };
        let mut machine = machine_with(&[0xEA], config);
        machine.bus_mut().raw_write(0xC010, 0xA9);
        machine.bus_mut().raw_write(0xC011, 0x7F);
        machine.tick();
        assert!(machine.monitor().is_halted());

        machine.resume(Some(0xC010));
        machine.tick();
        machine.tick();
        assert_eq!(machine.cpu().a(), 0x7F);
    }

    #[test]
    fn test_tracepoint_records_boundary_once() {
        let config = MachineConfig {
            tracepoints: vec![(0xC000, 0xC001)],
            ..no_patches()
        };
        let mut machine = machine_with(&[0xEA, 0xEA, 0x4C, 0x02, 0xC0], config);
        for _ in 0..20 {
            machine.tick();
        }
        let pcs: Vec<u16> = machine.monitor().trace().iter().map(|e| e.pc).collect();
        assert_eq!(pcs, vec![0xC000, 0xC001]);
    }

    #[test]
    fn test_request_reset_applies_on_next_tick() {
        let mut machine = machine_with(&[0xE8, 0x4C, 0x00, 0xC0], no_patches());
        for _ in 0..7 {
            machine.tick();
        }
        machine.request_reset();
        assert_ne!(machine.cpu().pc(), 0xC000);
        machine.tick();
        // Reset then one fetch tick at the vector
        assert_eq!(machine.cpu().pc(), 0xC001);
        assert_eq!(machine.cpu().sp(), 0xFD);
        assert_eq!(machine.vic().raster_x(), 8);
    }

    #[test]
    fn test_serial_patch_feeds_cursor_bytes() {
        use crate::system::patches::{SliceCursor, ACPTR};

        // JSR ACPTR; STA $0400; JMP *
        let program = [0x20, 0x13, 0xEE, 0x8D, 0x00, 0x04, 0x4C, 0x06, 0xC0];
        let mut machine = machine_with(&program, MachineConfig::default());
        assert!(machine.patches().get(ACPTR).is_some());
        machine.set_byte_cursor(SliceCursor::new(vec![0x5A]));
        for _ in 0..30 {
            machine.tick();
        }
        assert_eq!(machine.bus().raw_read(0x0400), 0x5A);
        assert!(!machine.cpu().flag_c());
    }

    #[test]
    fn test_patch_skipped_with_kernal_banked_out() {
        use crate::system::patches::SliceCursor;

        // LDA #$35; STA $01; JSR $EE13; STA $0400; JMP *
        let program = [
            0xA9, 0x35, 0x85, 0x01, 0x20, 0x13, 0xEE, 0x8D, 0x00, 0x04, 0x4C, 0x0A, 0xC0,
        ];
        let mut machine = machine_with(&program, MachineConfig::default());
        machine.set_byte_cursor(SliceCursor::new(vec![0x5A]));
        // RAM under the KERNAL: LDA #$77; RTS
        for (i, &byte) in [0xA9, 0x77, 0x60].iter().enumerate() {
            machine.bus_mut().raw_write(0xEE13 + i as u16, byte);
        }

        for _ in 0..60 {
            machine.tick();
        }

        assert!(!machine.bus().hiram());
        assert_eq!(machine.bus().raw_read(0x0400), 0x77);
    }

    #[test]
    fn test_patch_waits_out_stolen_cycles() {
        use crate::system::patches::{SliceCursor, ACPTR};

        // JSR ACPTR; JMP *
        let program = [0x20, 0x13, 0xEE, 0x4C, 0x03, 0xC0];
        let mut machine = machine_with(&program, MachineConfig::default());
        machine.set_byte_cursor(SliceCursor::new(vec![0x5A]));

        for _ in 0..20 {
            if machine.cpu().pc() == ACPTR && machine.cpu().at_instruction_boundary() {
                break;
            }
            machine.tick();
        }
        assert_eq!(machine.cpu().pc(), ACPTR);

        machine.bus_mut().interrupts_mut().request_bus(5);
        for _ in 0..5 {
            machine.tick();
        }
        assert_eq!(machine.cpu().pc(), ACPTR);
        assert_eq!(machine.cpu().a(), 0x00);

        machine.tick();
        assert_eq!(machine.cpu().pc(), 0xC003);
        assert_eq!(machine.cpu().a(), 0x5A);
    }

    struct HoldKey;

    impl InputSource for HoldKey {
        fn poll(&mut self) -> InputState {
            InputState {
                keys: KeyMatrix::from_keys([keys::A]),
                restore: false,
            }
        }
    }

    #[test]
    fn test_input_is_polled_on_first_tick() {
        let mut machine = machine_with(&[0x4C, 0x00, 0xC0], no_patches());
        machine.set_input_source(HoldKey);
        machine.tick();
        assert!(machine.cia1().keys().is_pressed(keys::A));
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut machine = machine_with(&[0xE8, 0x4C, 0x00, 0xC0], no_patches());
        for _ in 0..100 {
            machine.tick();
        }
        let bytes = machine.save_state().unwrap();
        let x = machine.cpu().x();
        let raster = machine.vic().raster_x();

        for _ in 0..500 {
            machine.tick();
        }
        machine.load_state(&bytes).unwrap();

        assert_eq!(machine.ticks(), 100);
        assert_eq!(machine.cpu().x(), x);
        assert_eq!(machine.vic().raster_x(), raster);
    }
}
