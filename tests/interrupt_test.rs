//! Integration tests for CPU interrupt and bus arbitration support.
//!
//! These tests verify:
//! - IRQ line checked after instruction execution, gated by I
//! - NMI taken once per edge, regardless of I, without setting I
//! - 7-cycle interrupt service sequence and pushed status
//! - BRK pushes PC+2 with B set
//! - A busy bus pauses the CPU without losing reserved cycles

use lib6510::{MemoryBus, CPU};

/// Flat RAM with test-controlled interrupt and arbitration signals.
struct SignalMemory {
    data: Box<[u8; 65536]>,
    irq: bool,
    nmi: bool,
    busy_cycles: u32,
}

impl SignalMemory {
    fn new() -> Self {
        let mut data = Box::new([0u8; 65536]);
        data[0xFFFC] = 0x00;
        data[0xFFFD] = 0x80;
        data[0xFFFE] = 0x00;
        data[0xFFFF] = 0x90;
        data[0xFFFA] = 0x00;
        data[0xFFFB] = 0xA0;
        Self {
            data,
            irq: false,
            nmi: false,
            busy_cycles: 0,
        }
    }
}

impl MemoryBus for SignalMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    fn irq_active(&self) -> bool {
        self.irq
    }

    fn poll_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi)
    }

    fn bus_busy(&mut self) -> bool {
        if self.busy_cycles > 0 {
            self.busy_cycles -= 1;
            true
        } else {
            false
        }
    }
}

fn setup_cpu(program: &[u8]) -> CPU<SignalMemory> {
    let mut memory = SignalMemory::new();
    for (i, byte) in program.iter().enumerate() {
        memory.write(0x8000 + i as u16, *byte);
    }
    CPU::new(memory)
}

#[test]
fn test_irq_ignored_while_i_set() {
    let mut cpu = setup_cpu(&[0xEA, 0xEA]);
    cpu.memory_mut().irq = true;

    cpu.step();

    assert_eq!(cpu.pc(), 0x8001);
}

#[test]
fn test_irq_serviced_after_instruction() {
    let mut cpu = setup_cpu(&[0xEA, 0xEA]);
    cpu.set_flag_i(false);
    cpu.set_flag_c(true);
    cpu.memory_mut().irq = true;

    let used = cpu.step();

    // NOP (2) + interrupt entry (7)
    assert_eq!(used, 9);
    assert_eq!(cpu.pc(), 0x9000);
    assert!(cpu.flag_i());
    assert_eq!(cpu.sp(), 0xFA);

    // Return address is the next instruction, status has B clear
    assert_eq!(cpu.memory().read(0x01FD), 0x80);
    assert_eq!(cpu.memory().read(0x01FC), 0x01);
    let status = cpu.memory().read(0x01FB);
    assert_eq!(status & 0b0001_0000, 0);
    assert_eq!(status & 0b0010_0000, 0b0010_0000);
    assert_eq!(status & 0x01, 0x01);
}

#[test]
fn test_irq_level_retriggers_after_rti() {
    let mut cpu = setup_cpu(&[0xEA, 0xEA]);
    cpu.memory_mut().write(0x9000, 0x40); // RTI
    cpu.set_flag_i(false);
    cpu.memory_mut().irq = true;

    cpu.step(); // NOP, then enter handler
    assert_eq!(cpu.pc(), 0x9000);

    cpu.step(); // RTI restores I=0 and the line is still held
    assert_eq!(cpu.pc(), 0x9000);
}

#[test]
fn test_nmi_ignores_i_flag_and_fires_once() {
    let mut cpu = setup_cpu(&[0xEA, 0xEA]);
    cpu.memory_mut().write(0xA000, 0xEA);
    cpu.memory_mut().write(0xA001, 0xEA);
    cpu.memory_mut().nmi = true;

    cpu.step();
    assert_eq!(cpu.pc(), 0xA000);

    cpu.step();
    assert_eq!(cpu.pc(), 0xA001);
}

#[test]
fn test_nmi_entry_leaves_i_flag_unchanged() {
    let mut cpu = setup_cpu(&[0xEA, 0xEA]);
    cpu.set_flag_i(false);
    cpu.memory_mut().nmi = true;

    let used = cpu.step();

    assert_eq!(used, 9);
    assert_eq!(cpu.pc(), 0xA000);
    assert!(!cpu.flag_i());
    // Pushed status carries I as it was, B clear
    assert_eq!(cpu.memory().read(0x01FB) & 0b0001_0100, 0);

    // IRQ can still preempt the NMI handler
    cpu.memory_mut().write(0xA000, 0xEA);
    cpu.memory_mut().irq = true;
    cpu.step();
    assert_eq!(cpu.pc(), 0x9000);
    assert!(cpu.flag_i());
}

#[test]
fn test_nmi_wins_over_irq() {
    let mut cpu = setup_cpu(&[0xEA]);
    cpu.set_flag_i(false);
    cpu.memory_mut().irq = true;
    cpu.memory_mut().nmi = true;

    cpu.step();

    assert_eq!(cpu.pc(), 0xA000);
}

#[test]
fn test_brk_pushes_pc_plus_two_with_break() {
    let mut cpu = setup_cpu(&[0x00, 0xFF]);

    let used = cpu.step();

    assert_eq!(used, 7);
    assert_eq!(cpu.pc(), 0x9000);
    assert_eq!(cpu.memory().read(0x01FD), 0x80);
    assert_eq!(cpu.memory().read(0x01FC), 0x02);
    assert_eq!(cpu.memory().read(0x01FB) & 0b0001_0000, 0b0001_0000);
    assert!(!cpu.flag_b(), "CPU B flag should not be set by BRK");
    assert!(cpu.flag_i());
}

#[test]
fn test_busy_bus_pauses_without_reset() {
    // LDA $1234 (4 cycles)
    let mut cpu = setup_cpu(&[0xAD, 0x34, 0x12]);
    cpu.memory_mut().write(0x1234, 0x55);

    cpu.tick(); // fetch
    cpu.memory_mut().busy_cycles = 3;
    for _ in 0..3 {
        assert!(!cpu.tick());
    }
    assert_eq!(cpu.a(), 0x00);

    // Two reserved ticks, then execute
    assert!(!cpu.tick());
    assert!(!cpu.tick());
    assert!(cpu.tick());
    assert_eq!(cpu.a(), 0x55);
    assert_eq!(cpu.cycles(), 7);
}

#[test]
fn test_busy_bus_delays_fetch() {
    let mut cpu = setup_cpu(&[0xEA]);
    cpu.memory_mut().busy_cycles = 40;

    cpu.run_for_cycles(40);
    assert_eq!(cpu.pc(), 0x8000);
    assert!(cpu.at_instruction_boundary());

    cpu.tick();
    assert_eq!(cpu.pc(), 0x8001);
}

#[test]
fn test_reset_reloads_vector() {
    let mut cpu = setup_cpu(&[0xA9, 0x01, 0x78]);
    cpu.step();
    cpu.set_flag_i(false);
    cpu.set_sp(0x10);

    cpu.reset();

    assert_eq!(cpu.pc(), 0x8000);
    assert_eq!(cpu.sp(), 0xFD);
    assert!(cpu.flag_i());
    assert_eq!(cpu.a(), 0x01);
}
